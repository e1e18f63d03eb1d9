//! Moving average of per-token model latency
//!
//! Latency is recorded per response token rather than per request: response
//! lengths vary by orders of magnitude, and dividing elapsed time by token
//! count yields a signal comparable across requests.

use std::sync::Mutex;

/// Exponentially weighted moving average with a warm-up phase
///
/// Until `warmup_samples` samples have been seen the estimate is a plain
/// arithmetic mean; after that each new sample is blended in with weight
/// `decay`. Callers must treat the estimate as undefined for ranking until
/// the average reports warmed up.
#[derive(Debug)]
pub struct MovingAverage {
    decay: f64,
    warmup_samples: u64,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    count: u64,
    value: f64,
}

impl MovingAverage {
    /// Create an empty average
    ///
    /// `decay` is the weight of the newest sample once warmed up, in (0, 1).
    pub fn new(decay: f64, warmup_samples: u64) -> Self {
        Self {
            decay,
            warmup_samples,
            inner: Mutex::new(Inner { count: 0, value: 0.0 }),
        }
    }

    /// Record one sample (nanoseconds per response token)
    pub fn add(&self, sample: f64) {
        let mut inner = self.inner.lock().expect("latency lock poisoned");

        let current = inner.value;

        if inner.count < self.warmup_samples {
            // Incremental arithmetic mean during warm-up
            let count = inner.count as f64;
            inner.value = current + (sample - current) / (count + 1.0);
        } else {
            inner.value = current * (1.0 - self.decay) + sample * self.decay;
        }

        inner.count += 1;
    }

    /// Current estimate and whether the warm-up phase is complete
    pub fn estimate(&self) -> (f64, bool) {
        let inner = self.inner.lock().expect("latency lock poisoned");
        (inner.value, inner.count >= self.warmup_samples)
    }
}
