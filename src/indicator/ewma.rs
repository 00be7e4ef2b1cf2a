/// Exponentially weighted moving average in the non-adjusted recursive form,
/// parameterized by center of mass: `alpha = 1 / (1 + com)`.
///
/// The recurrence is seeded by the first pushed value, so the output is
/// defined from the first push onward. This matches the smoothing convention
/// the RSI column is contractually tied to.
#[derive(Debug, Clone)]
pub struct Ewma {
    alpha: f64,
    value: Option<f64>,
}

impl Ewma {
    pub fn with_com(com: f64) -> Self {
        assert!(com >= 0.0, "center of mass must be >= 0");
        Self {
            alpha: 1.0 / (1.0 + com),
            value: None,
        }
    }

    /// Push a new observation and return the updated average.
    pub fn push(&mut self, x: f64) -> f64 {
        let next = match self.value {
            Some(prev) => (1.0 - self.alpha) * prev + self.alpha * x,
            None => x,
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}
