//! Fixed-capacity analysis window.
//!
//! Storage is a `heapless::Vec` sized by [`MAX_WINDOW_LEN`]; the active
//! length N is chosen at construction and never exceeds that capacity.

use heapless::Vec as HVec;

use crate::config::MAX_WINDOW_LEN;

/// One resampled accelerometer reading in fixed point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantizedSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

#[derive(Debug, Clone)]
pub struct AnalysisWindow {
    samples: HVec<QuantizedSample, MAX_WINDOW_LEN>,
    len: usize,
}

impl AnalysisWindow {
    /// `len` is clamped to the compile-time capacity.
    pub fn new(len: usize) -> Self {
        Self {
            samples: HVec::new(),
            len: len.min(MAX_WINDOW_LEN),
        }
    }

    /// Target number of samples (N).
    pub fn capacity(&self) -> usize {
        self.len
    }

    /// Samples written so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.len
    }

    /// Append a sample; returns `false` once the window already holds N.
    pub fn push(&mut self, sample: QuantizedSample) -> bool {
        if self.is_full() {
            return false;
        }
        self.samples.push(sample).is_ok()
    }

    /// Sample at `index`, or the neutral zero sample past the write cursor.
    pub fn get(&self, index: usize) -> QuantizedSample {
        self.samples.get(index).copied().unwrap_or_default()
    }

    pub fn samples(&self) -> &[QuantizedSample] {
        &self.samples
    }

    /// Reset the write cursor for the next period.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
