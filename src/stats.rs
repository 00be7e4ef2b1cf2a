use serde::Serialize;
use tracing::info;

use crate::model::tick::EnrichedTick;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Scalar aggregates over the full enriched series, computed once at startup
/// and cached for the process lifetime. Zero-valued when the series is empty
/// or a statistic is undefined (e.g. fewer than two daily returns).
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_ticks: u64,
    pub avg_price: f64,
    pub avg_bid_ask_spread: f64,
    pub daily_volatility_annualized: f64,
    pub avg_volume_per_min: f64,
    pub avg_order_flow_imbalance: f64,
}

impl Summary {
    pub fn zeroed() -> Self {
        Self {
            total_ticks: 0,
            avg_price: 0.0,
            avg_bid_ask_spread: 0.0,
            daily_volatility_annualized: 0.0,
            avg_volume_per_min: 0.0,
            avg_order_flow_imbalance: 0.0,
        }
    }
}

/// Pairwise Pearson correlation among the series' analytic columns. Held for
/// library consumers; not routed over the query API.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    labels: &'static [&'static str],
    values: Vec<Vec<f64>>,
}

pub const CORRELATION_COLUMNS: &[&str] = &[
    "last_price",
    "total_traded_volume",
    "bid_ask_spread",
    "volatility",
    "order_flow_imbalance",
];

impl CorrelationMatrix {
    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    /// Correlation between two named columns. Degenerate pairs (a column with
    /// zero variance) are NaN, matching the usual statistical convention.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| *l == a)?;
        let j = self.labels.iter().position(|l| *l == b)?;
        Some(self.values[i][j])
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample standard deviation (ddof = 1). Undefined below two observations.
fn sample_std(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs);
    let sq: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    Some((sq / (xs.len() as f64 - 1.0)).sqrt())
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n == 0 || n != ys.len() {
        return f64::NAN;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        cov += (x - mx) * (y - my);
        var_x += (x - mx) * (x - mx);
        var_y += (y - my) * (y - my);
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Annualized volatility of day-over-day returns: the last observed price of
/// each calendar day, percentage change between successive observed days,
/// sample std-dev scaled by sqrt(252). Zero when fewer than two returns.
fn daily_volatility(series: &[EnrichedTick]) -> f64 {
    let mut daily_closes: Vec<f64> = Vec::new();
    let mut current_day = None;
    for rec in series {
        let day = rec.timestamp().date_naive();
        if current_day == Some(day) {
            if let Some(close) = daily_closes.last_mut() {
                *close = rec.tick.last_price;
            }
        } else {
            current_day = Some(day);
            daily_closes.push(rec.tick.last_price);
        }
    }

    let returns: Vec<f64> = daily_closes
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    sample_std(&returns)
        .map(|s| s * TRADING_DAYS_PER_YEAR.sqrt())
        .unwrap_or(0.0)
}

/// Average traded volume per minute over the series' span. Minutes without a
/// tick contribute a zero-sum bucket, so this is total volume over the number
/// of 1-minute buckets between the first and last tick inclusive.
fn avg_volume_per_min(series: &[EnrichedTick]) -> f64 {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return 0.0;
    };
    let first_bucket = first.timestamp().timestamp().div_euclid(60);
    let last_bucket = last.timestamp().timestamp().div_euclid(60);
    let buckets = (last_bucket - first_bucket + 1) as f64;
    let total: f64 = series.iter().map(|r| r.tick.total_traded_volume).sum();
    total / buckets
}

/// Compute the one-shot summary and correlation matrix over the enriched
/// series.
pub fn compute(series: &[EnrichedTick]) -> (Summary, CorrelationMatrix) {
    let prices: Vec<f64> = series.iter().map(|r| r.tick.last_price).collect();
    let volumes: Vec<f64> = series.iter().map(|r| r.tick.total_traded_volume).collect();
    let spreads: Vec<f64> = series.iter().map(|r| r.bid_ask_spread).collect();
    let volatilities: Vec<f64> = series.iter().map(|r| r.volatility).collect();
    let imbalances: Vec<f64> = series.iter().map(|r| r.order_flow_imbalance()).collect();

    let summary = if series.is_empty() {
        Summary::zeroed()
    } else {
        Summary {
            total_ticks: series.len() as u64,
            avg_price: mean(&prices),
            avg_bid_ask_spread: mean(&spreads),
            daily_volatility_annualized: daily_volatility(series),
            avg_volume_per_min: avg_volume_per_min(series),
            avg_order_flow_imbalance: mean(&imbalances),
        }
    };

    let columns = [&prices, &volumes, &spreads, &volatilities, &imbalances];
    let mut values = vec![vec![f64::NAN; columns.len()]; columns.len()];
    for (i, xs) in columns.iter().enumerate() {
        for (j, ys) in columns.iter().enumerate() {
            values[i][j] = pearson(xs, ys);
        }
    }

    info!(ticks = summary.total_ticks, "statistical summary computed");
    (
        summary,
        CorrelationMatrix {
            labels: CORRELATION_COLUMNS,
            values,
        },
    )
}
