//! Fixed-capacity sample window for rolling statistics

use std::time::Duration;

/// Keeps the most recent `capacity` samples, overwriting the oldest once
/// full.
pub struct RollingWindow<T> {
    samples: Vec<T>,
    capacity: usize,
    cursor: usize,
}

impl<T: Clone> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    pub fn push(&mut self, sample: T) {
        if self.samples.len() < self.capacity {
            self.samples.push(sample);
        } else {
            self.samples[self.cursor] = sample;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// Specialized for Duration, the tick-timing case
impl RollingWindow<Duration> {
    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }

        let sum: Duration = self.samples.iter().sum();
        sum / self.samples.len() as u32
    }

    pub fn min_max(&self) -> (Duration, Duration) {
        match (self.samples.iter().min(), self.samples.iter().max()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => (Duration::ZERO, Duration::ZERO),
        }
    }
}
