/// Rolling mean over a fixed window, using a ring buffer for O(1) push.
#[derive(Debug, Clone)]
pub struct RollingMean {
    period: usize,
    buffer: Vec<f64>,
    head: usize,
    count: usize,
    sum: f64,
}

impl RollingMean {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "rolling period must be > 0");
        Self {
            period,
            buffer: vec![0.0; period],
            head: 0,
            count: 0,
            sum: 0.0,
        }
    }

    /// Push a new value, return the current mean once the window is full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if self.count >= self.period {
            self.sum -= self.buffer[self.head];
        }
        self.buffer[self.head] = value;
        self.sum += value;
        self.head = (self.head + 1) % self.period;
        if self.count < self.period {
            self.count += 1;
        }

        if self.count >= self.period {
            Some(self.sum / self.period as f64)
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.period
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Rolling sample standard deviation (ddof = 1) over a fixed window.
///
/// The deviation is recomputed from the buffered window on each push instead
/// of tracking a running sum of squares, which keeps the result exact for the
/// short windows used here.
#[derive(Debug, Clone)]
pub struct RollingStd {
    period: usize,
    buffer: Vec<f64>,
    head: usize,
    count: usize,
}

impl RollingStd {
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "std-dev period must be > 1");
        Self {
            period,
            buffer: vec![0.0; period],
            head: 0,
            count: 0,
        }
    }

    /// Push a new value, return the window's sample std-dev once full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.buffer[self.head] = value;
        self.head = (self.head + 1) % self.period;
        if self.count < self.period {
            self.count += 1;
        }

        if self.count < self.period {
            return None;
        }
        let n = self.period as f64;
        let mean = self.buffer.iter().sum::<f64>() / n;
        let sq_dev = self
            .buffer
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>();
        Some((sq_dev / (n - 1.0)).sqrt())
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.period
    }
}
