use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;
use crate::model::candle::{BarBuilder, OhlcvBar};
use crate::model::tick::EnrichedTick;

/// Accepted bucket widths for the OHLCV view. Anything outside this set is a
/// client error, not a pipeline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
}

impl Timeframe {
    pub fn width_secs(self) -> i64 {
        match self {
            Timeframe::OneMinute => 60,
            Timeframe::FiveMinutes => 300,
            Timeframe::FifteenMinutes => 900,
            Timeframe::OneHour => 3_600,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1Min",
            Timeframe::FiveMinutes => "5Min",
            Timeframe::FifteenMinutes => "15Min",
            Timeframe::OneHour => "1H",
        }
    }
}

impl FromStr for Timeframe {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1Min" => Ok(Timeframe::OneMinute),
            "5Min" => Ok(Timeframe::FiveMinutes),
            "15Min" => Ok(Timeframe::FifteenMinutes),
            "1H" => Ok(Timeframe::OneHour),
            other => Err(AppError::InvalidTimeframe(other.to_string())),
        }
    }
}

/// Per-1-minute order book view: mean spread and mean order-flow imbalance.
#[derive(Debug, Clone, Serialize)]
pub struct OrderbookRow {
    pub timestamp: i64,
    pub bid_ask_spread: f64,
    pub order_flow_imbalance: f64,
}

/// Per-1-minute indicator snapshot: mean of each indicator column. Field
/// names match what the charting consumers already expect.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorRow {
    pub timestamp: i64,
    pub rsi_14_period: f64,
    pub ma_5_period: f64,
    pub ma_10_period: f64,
    pub ma_20_period: f64,
    pub vwap: f64,
}

fn bucket_start(epoch_secs: i64, width_secs: i64) -> i64 {
    epoch_secs.div_euclid(width_secs) * width_secs
}

/// Resample the series into OHLCV bars of the given width. Buckets with no
/// ticks are simply not emitted. The series is already ordered by timestamp,
/// so a single forward scan closes each bar when a tick leaves its bucket.
pub fn ohlcv_bars(series: &[EnrichedTick], timeframe: Timeframe) -> Vec<OhlcvBar> {
    let width = timeframe.width_secs();
    let mut bars: Vec<OhlcvBar> = Vec::new();
    let mut builder: Option<BarBuilder> = None;

    for rec in series {
        let epoch = rec.timestamp().timestamp();
        let price = rec.tick.last_price;
        let volume = rec.tick.total_traded_volume;
        match builder {
            Some(ref mut b) if b.contains(epoch) => b.update(price, volume),
            ref mut slot => {
                if let Some(done) = slot.take() {
                    bars.push(done.finish());
                }
                *slot = Some(BarBuilder::new(price, volume, epoch, width));
            }
        }
    }
    if let Some(b) = builder {
        bars.push(b.finish());
    }
    bars
}

/// Sums for one open 1-minute mean bucket.
struct MeanBucket {
    start: i64,
    count: f64,
    sums: Vec<f64>,
}

/// Bucketed means over arbitrary per-record columns: one forward scan,
/// emitting a row per non-empty 1-minute bucket.
fn minute_means<F>(series: &[EnrichedTick], columns: usize, extract: F) -> Vec<MeanBucket>
where
    F: Fn(&EnrichedTick) -> Vec<f64>,
{
    let width = Timeframe::OneMinute.width_secs();
    let mut out: Vec<MeanBucket> = Vec::new();
    let mut open: Option<MeanBucket> = None;

    for rec in series {
        let start = bucket_start(rec.timestamp().timestamp(), width);
        let values = extract(rec);
        debug_assert_eq!(values.len(), columns);
        match open {
            Some(ref mut bucket) if bucket.start == start => {
                bucket.count += 1.0;
                for (sum, v) in bucket.sums.iter_mut().zip(values) {
                    *sum += v;
                }
            }
            ref mut slot => {
                if let Some(done) = slot.take() {
                    out.push(done);
                }
                *slot = Some(MeanBucket {
                    start,
                    count: 1.0,
                    sums: values,
                });
            }
        }
    }
    if let Some(done) = open {
        out.push(done);
    }
    out
}

pub fn orderbook_rows(series: &[EnrichedTick]) -> Vec<OrderbookRow> {
    minute_means(series, 2, |rec| {
        vec![rec.bid_ask_spread, rec.order_flow_imbalance()]
    })
    .into_iter()
    .map(|b| OrderbookRow {
        timestamp: b.start,
        bid_ask_spread: b.sums[0] / b.count,
        order_flow_imbalance: b.sums[1] / b.count,
    })
    .collect()
}

pub fn indicator_rows(series: &[EnrichedTick]) -> Vec<IndicatorRow> {
    minute_means(series, 5, |rec| {
        vec![rec.rsi, rec.ma_5, rec.ma_10, rec.ma_20, rec.vwap]
    })
    .into_iter()
    .map(|b| IndicatorRow {
        timestamp: b.start,
        rsi_14_period: b.sums[0] / b.count,
        ma_5_period: b.sums[1] / b.count,
        ma_10_period: b.sums[2] / b.count,
        ma_20_period: b.sums[3] / b.count,
        vwap: b.sums[4] / b.count,
    })
    .collect()
}
