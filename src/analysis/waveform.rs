//! Live waveform for the display: one axis, high-passed to drop gravity,
//! normalised and clamped to [-1, 1]. Not used for classification.

use crate::config::Axis;
use crate::events::RawSample;

#[derive(Debug, Clone)]
pub struct WaveformProjector {
    axis: Axis,
    alpha: f32,
    full_scale: f32,
    prev_in: Option<f32>,
    prev_out: f32,
}

impl WaveformProjector {
    pub fn new(axis: Axis, alpha: f32, full_scale: f32) -> Self {
        Self {
            axis,
            alpha: alpha.clamp(0.0, 1.0),
            full_scale: if full_scale > 0.0 { full_scale } else { 1.0 },
            prev_in: None,
            prev_out: 0.0,
        }
    }

    pub fn push(&mut self, raw: RawSample) -> f32 {
        let x = match self.axis {
            Axis::X => raw.x,
            Axis::Y => raw.y,
            Axis::Z => raw.z,
        };
        // First sample seeds the filter so gravity does not show as a step.
        let prev_in = self.prev_in.replace(x).unwrap_or(x);
        let y = self.alpha * (self.prev_out + x - prev_in);
        self.prev_out = if y.is_finite() { y } else { 0.0 };

        (self.prev_out / self.full_scale).clamp(-1.0, 1.0)
    }
}
