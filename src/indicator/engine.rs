use tracing::info;

use crate::indicator::rolling::{RollingMean, RollingStd};
use crate::indicator::rsi::Rsi;
use crate::indicator::vwap::CumulativeVwap;
use crate::model::tick::{EnrichedTick, Tick};

const VOLATILITY_PERIOD: usize = 20;
const MA_SHORT: usize = 5;
const MA_MID: usize = 10;
const MA_LONG: usize = 20;
const RSI_COM: f64 = 13.0;

/// One record's indicator set before the null post-pass. Rolling columns are
/// `None` inside their warm-up window; the cumulative and pointwise columns
/// are always defined.
struct IndicatorRow {
    tick: Tick,
    volatility: Option<f64>,
    ma_5: Option<f64>,
    ma_10: Option<f64>,
    ma_20: Option<f64>,
    vwap: f64,
    bid_ask_spread: f64,
    rsi: f64,
}

/// Compute all derived columns over the cleaned series, then drop every
/// record with an incomplete indicator set.
///
/// The drop is a single explicit post-pass over the full per-record set so
/// the warm-up removal stays a whole-row operation: for a gapless series this
/// removes exactly the first `MA_LONG - 1` records.
pub fn enrich(series: Vec<Tick>) -> Vec<EnrichedTick> {
    let input_len = series.len();

    let mut volatility = RollingStd::new(VOLATILITY_PERIOD);
    let mut ma_5 = RollingMean::new(MA_SHORT);
    let mut ma_10 = RollingMean::new(MA_MID);
    let mut ma_20 = RollingMean::new(MA_LONG);
    let mut vwap = CumulativeVwap::new();
    let mut rsi = Rsi::with_com(RSI_COM);

    let rows: Vec<IndicatorRow> = series
        .into_iter()
        .map(|tick| {
            let price = tick.last_price;
            let volume = tick.total_traded_volume;
            IndicatorRow {
                volatility: volatility.push(price),
                ma_5: ma_5.push(price),
                ma_10: ma_10.push(price),
                ma_20: ma_20.push(price),
                vwap: vwap.push(price, volume),
                bid_ask_spread: tick.bid_ask_spread(),
                rsi: rsi.push(price),
                tick,
            }
        })
        .collect();

    let enriched: Vec<EnrichedTick> = rows
        .into_iter()
        .filter_map(|row| {
            Some(EnrichedTick {
                volatility: row.volatility?,
                ma_5: row.ma_5?,
                ma_10: row.ma_10?,
                ma_20: row.ma_20?,
                vwap: row.vwap,
                bid_ask_spread: row.bid_ask_spread,
                rsi: row.rsi,
                tick: row.tick,
            })
        })
        .collect();

    info!(
        input = input_len,
        output = enriched.len(),
        dropped = input_len - enriched.len(),
        "indicator warm-up rows dropped"
    );
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tick(i: i64, price: f64) -> Tick {
        Tick {
            timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 9, 15, 0).unwrap()
                + chrono::Duration::seconds(i),
            last_price: price,
            buy_price: price - 0.5,
            sell_price: price + 0.5,
            buy_quantity: 10.0,
            sell_quantity: 8.0,
            total_traded_volume: 100.0,
        }
    }

    fn series(n: usize) -> Vec<Tick> {
        (0..n).map(|i| tick(i as i64, 100.0 + i as f64 * 0.25)).collect()
    }

    #[test]
    fn drops_exactly_the_warmup_window() {
        let enriched = enrich(series(50));
        assert_eq!(enriched.len(), 50 - (VOLATILITY_PERIOD - 1));
        // First surviving record is the 20th input record.
        assert!((enriched[0].tick.last_price - (100.0 + 19.0 * 0.25)).abs() < 1e-12);
    }

    #[test]
    fn short_series_is_emptied() {
        let enriched = enrich(series(19));
        assert!(enriched.is_empty());
    }

    #[test]
    fn ma_and_spread_values_are_sane() {
        let enriched = enrich(series(25));
        for rec in &enriched {
            assert!((rec.bid_ask_spread - 1.0).abs() < 1e-12);
            assert!((0.0..=100.0).contains(&rec.rsi));
            // Rising series: the short MA tracks price more closely than the
            // long MA, so it must sit above it.
            assert!(rec.ma_5 > rec.ma_20);
        }
    }

    #[test]
    fn vwap_matches_cumulative_formula() {
        let ticks = series(22);
        let expected: f64 = {
            let pv: f64 = ticks.iter().map(|t| t.last_price * t.total_traded_volume).sum();
            let vol: f64 = ticks.iter().map(|t| t.total_traded_volume).sum();
            pv / (vol + 1e-10)
        };
        let enriched = enrich(ticks);
        let last = enriched.last().unwrap();
        assert!((last.vwap - expected).abs() < 1e-9);
    }
}
