//! Error-diffusion rate converter.
//!
//! Maps `input_per_window` raw samples onto exactly N window slots. The
//! accumulator gains N per raw sample and a slot is written each time it
//! reaches `input_per_window`, so emitted samples are spaced as evenly as
//! integer arithmetic allows and timing error never accumulates.

use crate::events::RawSample;

use super::quantize::quantize;
use super::window::{AnalysisWindow, QuantizedSample};

#[derive(Debug, Clone)]
pub struct RateConverter {
    window: AnalysisWindow,
    input_per_window: u32,
    output_per_window: u32,
    scale: i16,
    err: u32,
    raw_seen: u32,
}

impl RateConverter {
    pub fn new(input_per_window: u32, output_per_window: usize, scale: i16) -> Self {
        Self {
            window: AnalysisWindow::new(output_per_window),
            input_per_window: input_per_window.max(1),
            output_per_window: output_per_window as u32,
            scale,
            err: 0,
            raw_seen: 0,
        }
    }

    /// Feed one raw sample. Returns `true` if it was written into the window.
    pub fn push(&mut self, raw: RawSample) -> bool {
        self.raw_seen = self.raw_seen.saturating_add(1);
        self.err += self.output_per_window;
        if self.err < self.input_per_window {
            return false;
        }
        self.err -= self.input_per_window;

        self.window.push(QuantizedSample {
            x: quantize(raw.x, self.scale),
            y: quantize(raw.y, self.scale),
            z: quantize(raw.z, self.scale),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.window.is_full()
    }

    pub fn window(&self) -> &AnalysisWindow {
        &self.window
    }

    /// Raw samples observed since the window started.
    pub fn raw_seen(&self) -> u32 {
        self.raw_seen
    }

    /// Start a new window, discarding any partial one.
    pub fn begin_window(&mut self) {
        self.window.clear();
        self.err = 0;
        self.raw_seen = 0;
    }
}
