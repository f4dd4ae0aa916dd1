//! Moving-average smoothing of vision offsets.

use std::collections::VecDeque;

/// Fixed-capacity window of the most recent samples.
#[derive(Debug, Clone)]
pub struct SmoothingWindow {
    buf: VecDeque<f64>,
    cap: usize,
}

impl SmoothingWindow {
    /// A zero length is treated as 1 (identity).
    pub fn new(len: usize) -> Self {
        let cap = len.max(1);
        Self {
            buf: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Insert `sample`, evicting the oldest once full, and return the mean of
    /// the window.
    pub fn push(&mut self, sample: f64) -> f64 {
        self.buf.push_back(sample);
        if self.buf.len() > self.cap {
            self.buf.pop_front();
        }
        let mut sum = 0.0;
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in &self.buf {
            sum += v;
            lo = lo.min(v);
            hi = hi.max(v);
        }
        let mean = sum / self.buf.len() as f64;
        // Rounding in the sum can land a hair outside the window's range.
        mean.clamp(lo, hi)
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }
}
