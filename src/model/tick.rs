use chrono::{DateTime, Utc};

/// A normalized record straight out of the loader. Numeric fields that failed
/// coercion (or were absent in the source row) are `None` until the cleaner
/// resolves them.
#[derive(Debug, Clone)]
pub struct RawTick {
    pub timestamp: DateTime<Utc>,
    pub last_price: Option<f64>,
    pub buy_price: Option<f64>,
    pub sell_price: Option<f64>,
    pub buy_quantity: Option<f64>,
    pub sell_quantity: Option<f64>,
    pub total_traded_volume: Option<f64>,
}

/// A fully populated tick record. After cleaning, every field is present and
/// the series is ordered ascending by `timestamp` (ties keep input order).
#[derive(Debug, Clone)]
pub struct Tick {
    pub timestamp: DateTime<Utc>,
    pub last_price: f64,
    pub buy_price: f64,
    pub sell_price: f64,
    pub buy_quantity: f64,
    pub sell_quantity: f64,
    pub total_traded_volume: f64,
}

impl Tick {
    pub fn order_flow_imbalance(&self) -> f64 {
        self.buy_quantity - self.sell_quantity
    }

    pub fn bid_ask_spread(&self) -> f64 {
        self.sell_price - self.buy_price
    }
}

/// A tick plus its derived indicator columns. Only records with a complete
/// indicator set survive enrichment, so every column here is a plain `f64`.
#[derive(Debug, Clone)]
pub struct EnrichedTick {
    pub tick: Tick,
    pub volatility: f64,
    pub ma_5: f64,
    pub ma_10: f64,
    pub ma_20: f64,
    pub vwap: f64,
    pub bid_ask_spread: f64,
    pub rsi: f64,
}

impl EnrichedTick {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.tick.timestamp
    }

    pub fn order_flow_imbalance(&self) -> f64 {
        self.tick.order_flow_imbalance()
    }
}
