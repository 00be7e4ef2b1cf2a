const EPSILON: f64 = 1e-10;

/// Cumulative-from-start volume-weighted average price. This is a monotone
/// cumulative statistic, not a windowed one: pushing more ticks never changes
/// the values already emitted for earlier ticks.
#[derive(Debug, Clone, Default)]
pub struct CumulativeVwap {
    cum_price_volume: f64,
    cum_volume: f64,
}

impl CumulativeVwap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one tick and return the VWAP up to and including it.
    pub fn push(&mut self, price: f64, volume: f64) -> f64 {
        self.cum_price_volume += price * volume;
        self.cum_volume += volume;
        self.cum_price_volume / (self.cum_volume + EPSILON)
    }
}
