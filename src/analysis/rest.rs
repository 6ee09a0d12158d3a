//! Integer motion energy and the resting/active hysteresis.

use crate::config::RestThresholds;

use super::window::AnalysisWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestState {
    #[default]
    Resting,
    Active,
}

/// Mean-removed mean-square energy of all three axes, in the window's
/// fixed-point scale: `Σ(dx²+dy²+dz²) / n / scale`.
pub fn mean_square_3d(window: &AnalysisWindow, scale: i16) -> i32 {
    let samples = window.samples();
    if samples.is_empty() {
        return 0;
    }
    let n = samples.len() as i64;

    let (mut sx, mut sy, mut sz) = (0i64, 0i64, 0i64);
    for s in samples {
        sx += s.x as i64;
        sy += s.y as i64;
        sz += s.z as i64;
    }
    let (mx, my, mz) = (sx / n, sy / n, sz / n);

    let mut acc = 0i64;
    for s in samples {
        let dx = s.x as i64 - mx;
        let dy = s.y as i64 - my;
        let dz = s.z as i64 - mz;
        acc += dx * dx + dy * dy + dz * dz;
    }

    let scale = if scale == 0 { 1 } else { scale.unsigned_abs() as i64 };
    (acc / n / scale).min(i32::MAX as i64) as i32
}

#[derive(Debug, Clone)]
pub struct RestTracker {
    state: RestState,
    thresholds: RestThresholds,
    energy: i32,
}

impl RestTracker {
    pub fn new(thresholds: RestThresholds) -> Self {
        Self {
            state: RestState::Resting,
            thresholds,
            energy: 0,
        }
    }

    /// Feed one window's energy; returns the (possibly new) state.
    pub fn update(&mut self, energy: i32) -> RestState {
        self.energy = energy;
        self.state = match self.state {
            RestState::Resting if energy > self.thresholds.exit => {
                log::debug!("rest → active (energy {})", energy);
                RestState::Active
            }
            RestState::Active if energy < self.thresholds.enter => {
                log::debug!("active → rest (energy {})", energy);
                RestState::Resting
            }
            unchanged => unchanged,
        };
        self.state
    }

    pub fn update_from_window(&mut self, window: &AnalysisWindow, scale: i16) -> RestState {
        self.update(mean_square_3d(window, scale))
    }

    pub fn state(&self) -> RestState {
        self.state
    }

    pub fn is_resting(&self) -> bool {
        self.state == RestState::Resting
    }

    /// Energy of the most recent window.
    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn thresholds(&self) -> RestThresholds {
        self.thresholds
    }
}
