//! Rhythmicity gate: is the 3–7 Hz energy a genuine periodic motion?

use crate::config::GateThresholds;

use super::spectrum::SpectralResult;

/// Output of the spectral analyzer once the gate has been applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementAnalysis {
    pub tremor_power: f32,
    pub dyskinesia_power: f32,
    /// Zero unless `is_rhythmic`.
    pub peak_frequency_hz: f32,
    pub is_rhythmic: bool,
}

#[inline]
fn ratio(num: f32, den: f32) -> f32 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

pub fn is_rhythmic(r: &SpectralResult, t: &GateThresholds) -> bool {
    let dominance = ratio(r.peak_power, r.band37_power);
    let band_share = ratio(r.band37_power, r.total_power);

    band_share >= t.band_share_min
        && (dominance >= t.dominance_ratio_min || r.peakiness >= t.peakiness_min)
        && r.band37_power >= t.slow_reject_mul * r.slow_power
}

/// Apply the gate. Band powers pass through either way for display.
pub fn gate(r: &SpectralResult, t: &GateThresholds) -> MovementAnalysis {
    let rhythmic = is_rhythmic(r, t);
    MovementAnalysis {
        tremor_power: r.tremor_power,
        dyskinesia_power: r.dyskinesia_power,
        peak_frequency_hz: if rhythmic { r.peak_frequency_hz } else { 0.0 },
        is_rhythmic: rhythmic,
    }
}
