use super::ewma::Ewma;

const EPSILON: f64 = 1e-10;

/// Relative Strength Index over EWMA-smoothed gains and losses.
///
/// A center of mass of 13 is the 14-period-equivalent parameterization. The
/// first tick has no prior price, so it contributes gain = loss = 0 and the
/// oscillator is defined from the first tick onward.
#[derive(Debug)]
pub struct Rsi {
    prev_price: Option<f64>,
    avg_gain: Ewma,
    avg_loss: Ewma,
}

impl Rsi {
    pub fn with_com(com: f64) -> Self {
        Self {
            prev_price: None,
            avg_gain: Ewma::with_com(com),
            avg_loss: Ewma::with_com(com),
        }
    }

    /// Push a price, return the current RSI in [0, 100].
    pub fn push(&mut self, price: f64) -> f64 {
        let (gain, loss) = match self.prev_price.replace(price) {
            Some(prev) => {
                let delta = price - prev;
                (delta.max(0.0), (-delta).max(0.0))
            }
            None => (0.0, 0.0),
        };

        let avg_gain = self.avg_gain.push(gain);
        let avg_loss = self.avg_loss.push(loss);
        let rs = avg_gain / (avg_loss + EPSILON);
        100.0 - (100.0 / (1.0 + rs))
    }
}
