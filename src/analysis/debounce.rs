//! Confirmation-count debouncer turning per-window candidates into a stable
//! symptom class.
//!
//! Clearing is immediate: rest, a failed rhythm gate, or a zero peak wipes
//! all state in the same period. Promotion needs `confirm_threshold`
//! consecutive periods agreeing on a class that differs from the accepted one.

use crate::config::{DYSKINESIA_BAND_MAX_HZ, DYSKINESIA_BAND_MIN_HZ, TREMOR_BAND_MIN_HZ};
use crate::events::{class_hz, SymptomClass};

use super::rhythm::MovementAnalysis;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassificationState {
    pub accepted: Option<SymptomClass>,
    pub pending: Option<SymptomClass>,
    pub confirm_count: u8,
    /// Peak frequency of the last window that agreed with `accepted`.
    pub accepted_frequency_hz: f32,
}

impl ClassificationState {
    pub fn accepted_class_hz(&self) -> u8 {
        class_hz(self.accepted)
    }

    pub fn pending_class_hz(&self) -> u8 {
        class_hz(self.pending)
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

/// Pick tremor or dyskinesia from the band powers, falling back to the peak's
/// sub-band when neither dominates by `margin`.
pub fn candidate_class(a: &MovementAnalysis, margin: f32) -> Option<SymptomClass> {
    if a.dyskinesia_power > a.tremor_power * margin {
        return Some(SymptomClass::Dyskinesia);
    }
    if a.tremor_power > a.dyskinesia_power * margin {
        return Some(SymptomClass::Tremor);
    }

    let f = a.peak_frequency_hz;
    if (TREMOR_BAND_MIN_HZ..DYSKINESIA_BAND_MIN_HZ).contains(&f) {
        Some(SymptomClass::Tremor)
    } else if (DYSKINESIA_BAND_MIN_HZ..=DYSKINESIA_BAND_MAX_HZ).contains(&f) {
        Some(SymptomClass::Dyskinesia)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    state: ClassificationState,
    margin: f32,
    confirm_threshold: u8,
}

impl Debouncer {
    /// `confirm_threshold` below 1 is raised to 1.
    pub fn new(margin: f32, confirm_threshold: u8) -> Self {
        Self {
            state: ClassificationState::default(),
            margin,
            confirm_threshold: confirm_threshold.max(1),
        }
    }

    pub fn state(&self) -> ClassificationState {
        self.state
    }

    pub fn accepted(&self) -> Option<SymptomClass> {
        self.state.accepted
    }

    /// Frequency reported alongside the accepted class, 0 when none.
    pub fn accepted_frequency_hz(&self) -> f32 {
        self.state.accepted_frequency_hz
    }

    pub fn reset(&mut self) {
        self.state = ClassificationState::default();
    }

    /// Advance one analysis period and return the accepted class.
    pub fn update(&mut self, analysis: &MovementAnalysis, resting: bool) -> Option<SymptomClass> {
        if resting || !analysis.is_rhythmic || analysis.peak_frequency_hz == 0.0 {
            self.reset();
            return None;
        }

        let Some(candidate) = candidate_class(analysis, self.margin) else {
            return self.state.accepted;
        };

        let s = &mut self.state;
        if Some(candidate) == s.accepted {
            s.pending = s.accepted;
            s.confirm_count = 0;
            s.accepted_frequency_hz = analysis.peak_frequency_hz;
            return s.accepted;
        }

        if Some(candidate) == s.pending {
            s.confirm_count = s.confirm_count.saturating_add(1);
        } else {
            s.pending = Some(candidate);
            s.confirm_count = 1;
        }

        if s.confirm_count >= self.confirm_threshold {
            log::info!(
                "Class confirmed: {} ({:.2} Hz)",
                candidate.display_name(),
                analysis.peak_frequency_hz
            );
            s.accepted = Some(candidate);
            s.accepted_frequency_hz = analysis.peak_frequency_hz;
            s.confirm_count = 0;
        }

        s.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rhythmic(tremor: f32, dysk: f32, peak: f32) -> MovementAnalysis {
        MovementAnalysis {
            tremor_power: tremor,
            dyskinesia_power: dysk,
            peak_frequency_hz: peak,
            is_rhythmic: true,
        }
    }

    fn tremor() -> MovementAnalysis {
        rhythmic(100.0, 10.0, 4.0)
    }

    fn dyskinesia() -> MovementAnalysis {
        rhythmic(10.0, 100.0, 6.0)
    }

    fn noise() -> MovementAnalysis {
        MovementAnalysis {
            tremor_power: 50.0,
            dyskinesia_power: 50.0,
            peak_frequency_hz: 0.0,
            is_rhythmic: false,
        }
    }

    #[test]
    fn margin_picks_dominant_band() {
        assert_eq!(candidate_class(&tremor(), 1.15), Some(SymptomClass::Tremor));
        assert_eq!(candidate_class(&dyskinesia(), 1.15), Some(SymptomClass::Dyskinesia));
    }

    #[test]
    fn near_tie_falls_back_to_peak_sub_band() {
        assert_eq!(
            candidate_class(&rhythmic(100.0, 110.0, 4.3), 1.15),
            Some(SymptomClass::Tremor)
        );
        assert_eq!(
            candidate_class(&rhythmic(110.0, 100.0, 6.7), 1.15),
            Some(SymptomClass::Dyskinesia)
        );
        assert_eq!(candidate_class(&rhythmic(100.0, 100.0, 7.5), 1.15), None);
    }

    #[test]
    fn five_hz_boundary_is_dyskinesia() {
        assert_eq!(
            candidate_class(&rhythmic(100.0, 100.0, 5.0), 1.15),
            Some(SymptomClass::Dyskinesia)
        );
    }

    #[test]
    fn threshold_one_confirms_immediately() {
        let mut d = Debouncer::new(1.15, 1);
        assert_eq!(d.update(&tremor(), false), Some(SymptomClass::Tremor));
        assert_eq!(d.state().accepted_class_hz(), 4);
        assert_eq!(d.state().confirm_count, 0);
    }

    #[test]
    fn isolated_window_does_not_stick_with_threshold_two() {
        let mut d = Debouncer::new(1.15, 2);
        assert_eq!(d.update(&noise(), false), None);
        assert_eq!(d.update(&tremor(), false), None);
        assert_eq!(d.state().pending_class_hz(), 4);
        assert_eq!(d.update(&noise(), false), None);
        assert!(d.state().is_clear());
        assert_eq!(d.update(&noise(), false), None);
    }

    #[test]
    fn consecutive_windows_confirm() {
        let mut d = Debouncer::new(1.15, 3);
        assert_eq!(d.update(&dyskinesia(), false), None);
        assert_eq!(d.update(&dyskinesia(), false), None);
        assert_eq!(d.update(&dyskinesia(), false), Some(SymptomClass::Dyskinesia));
        assert_eq!(d.state().confirm_count, 0);
    }

    #[test]
    fn switching_class_needs_fresh_confirmation() {
        let mut d = Debouncer::new(1.15, 2);
        d.update(&tremor(), false);
        d.update(&tremor(), false);
        assert_eq!(d.accepted(), Some(SymptomClass::Tremor));

        // One dyskinesia window is pending only.
        assert_eq!(d.update(&dyskinesia(), false), Some(SymptomClass::Tremor));
        assert_eq!(d.state().pending_class_hz(), 6);

        // Back to tremor: pending snaps to accepted, stale count dropped.
        assert_eq!(d.update(&tremor(), false), Some(SymptomClass::Tremor));
        assert_eq!(d.state().pending, Some(SymptomClass::Tremor));
        assert_eq!(d.state().confirm_count, 0);

        // Needs two in a row again.
        assert_eq!(d.update(&dyskinesia(), false), Some(SymptomClass::Tremor));
        assert_eq!(d.update(&dyskinesia(), false), Some(SymptomClass::Dyskinesia));
    }

    #[test]
    fn accepted_frequency_follows_accepted_class_only() {
        let mut d = Debouncer::new(1.15, 2);
        d.update(&rhythmic(100.0, 10.0, 4.3), false);
        d.update(&rhythmic(100.0, 10.0, 4.3), false);
        assert_eq!(d.accepted_frequency_hz(), 4.3);

        // pending dyskinesia does not leak its frequency
        d.update(&dyskinesia(), false);
        assert_eq!(d.accepted(), Some(SymptomClass::Tremor));
        assert_eq!(d.accepted_frequency_hz(), 4.3);

        // agreeing window refreshes it
        d.update(&rhythmic(100.0, 10.0, 3.7), false);
        assert_eq!(d.accepted_frequency_hz(), 3.7);

        d.update(&dyskinesia(), false);
        d.update(&dyskinesia(), false);
        assert_eq!(d.accepted(), Some(SymptomClass::Dyskinesia));
        assert_eq!(d.accepted_frequency_hz(), 6.0);

        d.update(&dyskinesia(), true);
        assert_eq!(d.accepted_frequency_hz(), 0.0);
    }

    #[test]
    fn reset_is_total_from_any_state() {
        let mut d = Debouncer::new(1.15, 2);
        d.update(&tremor(), false);
        d.update(&tremor(), false);
        d.update(&dyskinesia(), false);
        assert!(!d.state().is_clear());

        assert_eq!(d.update(&tremor(), true), None);
        assert!(d.state().is_clear());

        d.update(&tremor(), false);
        d.update(&rhythmic(100.0, 10.0, 0.0), false);
        let s = d.state();
        assert_eq!((s.accepted_class_hz(), s.pending_class_hz(), s.confirm_count), (0, 0, 0));
    }

    #[test]
    fn out_of_band_tie_leaves_state_untouched() {
        let mut d = Debouncer::new(1.15, 2);
        d.update(&tremor(), false);
        let before = d.state();
        d.update(&rhythmic(100.0, 100.0, 7.5), false);
        assert_eq!(d.state(), before);
    }

    #[test]
    fn zero_threshold_is_raised_to_one() {
        let mut d = Debouncer::new(1.15, 0);
        assert_eq!(d.update(&dyskinesia(), false), Some(SymptomClass::Dyskinesia));
    }
}
