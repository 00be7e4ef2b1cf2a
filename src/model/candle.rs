use serde::Serialize;

/// One OHLCV bar. `timestamp` is the bucket start in epoch seconds (UTC),
/// which is what the charting consumers expect.
#[derive(Debug, Clone, Serialize)]
pub struct OhlcvBar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Aggregates the ticks of a single aligned time bucket into an OHLCV bar.
#[derive(Debug, Clone)]
pub struct BarBuilder {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    bucket_start: i64,
    bucket_end: i64,
}

impl BarBuilder {
    /// Start a new bar from the first tick of a bucket. The bucket is aligned
    /// down to the interval width.
    pub fn new(price: f64, volume: f64, epoch_secs: i64, width_secs: i64) -> Self {
        assert!(width_secs > 0, "bucket width must be > 0");
        let bucket_start = epoch_secs.div_euclid(width_secs) * width_secs;
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
            bucket_start,
            bucket_end: bucket_start + width_secs,
        }
    }

    /// Fold another tick of the same bucket into the bar.
    pub fn update(&mut self, price: f64, volume: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.volume += volume;
    }

    /// Check whether a timestamp belongs to this bar's bucket.
    pub fn contains(&self, epoch_secs: i64) -> bool {
        epoch_secs >= self.bucket_start && epoch_secs < self.bucket_end
    }

    /// Finalize into an immutable bar.
    pub fn finish(&self) -> OhlcvBar {
        OhlcvBar {
            timestamp: self.bucket_start,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_builder_basics() {
        // 09:15:30 into a 1-minute bucket starting at 09:15:00.
        let mut bb = BarBuilder::new(100.0, 10.0, 33_330, 60);
        assert_eq!(bb.bucket_start, 33_300);
        assert!(bb.contains(33_300));
        assert!(bb.contains(33_359));
        assert!(!bb.contains(33_360));

        bb.update(105.0, 5.0);
        bb.update(95.0, 2.0);
        bb.update(102.0, 3.0);

        let bar = bb.finish();
        assert_eq!(bar.timestamp, 33_300);
        assert!((bar.open - 100.0).abs() < f64::EPSILON);
        assert!((bar.high - 105.0).abs() < f64::EPSILON);
        assert!((bar.low - 95.0).abs() < f64::EPSILON);
        assert!((bar.close - 102.0).abs() < f64::EPSILON);
        assert!((bar.volume - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    #[should_panic(expected = "bucket width must be > 0")]
    fn bar_builder_rejects_zero_width() {
        let _ = BarBuilder::new(100.0, 1.0, 60, 0);
    }
}
