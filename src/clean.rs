use tracing::info;

use crate::model::tick::{RawTick, Tick};

/// Forward-fill state: the most recent non-missing value per field.
#[derive(Default)]
struct LastSeen {
    last_price: Option<f64>,
    buy_price: Option<f64>,
    sell_price: Option<f64>,
    buy_quantity: Option<f64>,
    sell_quantity: Option<f64>,
    total_traded_volume: Option<f64>,
}

fn fill(slot: &mut Option<f64>, value: Option<f64>) -> Option<f64> {
    if value.is_some() {
        *slot = value;
    }
    *slot
}

/// Zero is not a valid quote in this market, so treat it as missing.
fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Record sources other than the CSV loader can hand us NaN or infinities;
/// they are as unusable as a gap, and a single NaN would otherwise poison
/// every cumulative column downstream.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Resolve missing values in a normalized series: zero bid/ask prices become
/// missing, every field is forward-filled from its most recent prior value,
/// and records still incomplete afterwards (leading rows before the first
/// fully populated one) are dropped.
///
/// Idempotent: cleaning an already-clean series changes nothing.
pub fn clean(series: Vec<RawTick>) -> Vec<Tick> {
    let input_len = series.len();
    let mut last = LastSeen::default();

    let cleaned: Vec<Tick> = series
        .into_iter()
        .filter_map(|raw| {
            let last_price = fill(&mut last.last_price, finite(raw.last_price));
            let buy_price = fill(&mut last.buy_price, nonzero(finite(raw.buy_price)));
            let sell_price = fill(&mut last.sell_price, nonzero(finite(raw.sell_price)));
            let buy_quantity = fill(&mut last.buy_quantity, finite(raw.buy_quantity));
            let sell_quantity = fill(&mut last.sell_quantity, finite(raw.sell_quantity));
            let total_traded_volume =
                fill(&mut last.total_traded_volume, finite(raw.total_traded_volume));

            Some(Tick {
                timestamp: raw.timestamp,
                last_price: last_price?,
                buy_price: buy_price?,
                sell_price: sell_price?,
                buy_quantity: buy_quantity?,
                sell_quantity: sell_quantity?,
                total_traded_volume: total_traded_volume?,
            })
        })
        .collect();

    info!(
        input = input_len,
        output = cleaned.len(),
        "series cleaned"
    );
    cleaned
}
