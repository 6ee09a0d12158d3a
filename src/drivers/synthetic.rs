// TremorWatch — Synthetic Accelerometer
//
// Deterministic stand-in for the ADXL345: gravity on Z plus any number of
// sinusoidal components, each spread over the axes with its own weights, and
// optional seeded uniform noise on every axis.
// Used by the host simulator and the tests.

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::events::RawSample;

use super::AccelSensor;

#[derive(Debug, Clone, Copy)]
pub struct Tone {
    pub freq_hz: f32,
    /// Peak amplitude, m/s².
    pub amplitude: f32,
    /// Per-axis share of the amplitude.
    pub weights: [f32; 3],
}

impl Tone {
    pub fn new(freq_hz: f32, amplitude: f32) -> Self {
        // same axis spread the bench rig produced
        Self {
            freq_hz,
            amplitude,
            weights: [1.0, 0.8, 0.4],
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticAccel {
    rate_hz: f32,
    gravity: f32,
    tones: Vec<Tone>,
    /// Peak noise amplitude (m/s²) and its generator.
    noise: Option<(f32, StdRng)>,
    index: u64,
    fail_inits: u32,
}

impl SyntheticAccel {
    pub fn new(rate_hz: u32) -> Self {
        Self {
            rate_hz: rate_hz.max(1) as f32,
            gravity: crate::config::STANDARD_GRAVITY,
            tones: Vec::new(),
            noise: None,
            index: 0,
            fail_inits: 0,
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tones.push(tone);
        self
    }

    /// Add uniform noise in `±amplitude` to every axis. The same seed yields
    /// the same sequence.
    pub fn with_noise(mut self, amplitude: f32, seed: u64) -> Self {
        self.noise = Some((amplitude.abs(), StdRng::seed_from_u64(seed)));
        self
    }

    /// Make the first `n` `init()` calls fail.
    pub fn failing_inits(mut self, n: u32) -> Self {
        self.fail_inits = n;
        self
    }

    /// Replace the signal content, keeping the sample clock.
    pub fn set_tones(&mut self, tones: &[Tone]) {
        self.tones.clear();
        self.tones.extend_from_slice(tones);
    }

    fn sample_at(&self, index: u64) -> RawSample {
        let t = index as f32 / self.rate_hz;
        let mut axes = [0.0f32, 0.0, self.gravity];
        for tone in &self.tones {
            let a = tone.amplitude * (2.0 * PI * tone.freq_hz * t).sin();
            for (axis, w) in axes.iter_mut().zip(tone.weights) {
                *axis += a * w;
            }
        }
        RawSample::new(axes[0], axes[1], axes[2])
    }
}

impl AccelSensor for SyntheticAccel {
    fn init(&mut self) -> anyhow::Result<()> {
        if self.fail_inits > 0 {
            self.fail_inits -= 1;
            anyhow::bail!("synthetic sensor not responding");
        }
        Ok(())
    }

    fn read_sample(&mut self) -> anyhow::Result<RawSample> {
        let mut s = self.sample_at(self.index);
        self.index += 1;
        if let Some((amplitude, rng)) = self.noise.as_mut() {
            s.x += rng.random_range(-*amplitude..=*amplitude);
            s.y += rng.random_range(-*amplitude..=*amplitude);
            s.z += rng.random_range(-*amplitude..=*amplitude);
        }
        Ok(s)
    }
}
