//! Windowed FFT of the signed 3-axis motion signal, reduced to band powers.
//!
//! The three axes are mean-removed and summed *with sign*: a magnitude would
//! fold every oscillation to positive values and double its frequency.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::*;

use super::window::AnalysisWindow;

/// Band sums and peak statistics for one window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralResult {
    pub tremor_power: f32,
    pub dyskinesia_power: f32,
    pub slow_power: f32,
    pub total_power: f32,
    pub band37_power: f32,
    pub peak_power: f32,
    pub peak_frequency_hz: f32,
    /// `None` when no bin fell inside 3–7 Hz.
    pub peak_index: Option<usize>,
    pub peakiness: f32,
}

pub struct SpectralAnalyzer {
    len: usize,
    sample_rate_hz: f32,
    fft: Arc<dyn Fft<f32>>,
    hamming: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    power: Vec<f32>,
}

impl SpectralAnalyzer {
    /// Plans the FFT and allocates every buffer up front; `analyze` does not
    /// allocate.
    pub fn new(len: usize, sample_rate_hz: f32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(len);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            len,
            sample_rate_hz,
            fft,
            hamming: hamming(len),
            buffer: vec![Complex::new(0.0, 0.0); len],
            scratch,
            power: vec![0.0; len / 2],
        }
    }

    pub fn frequency_resolution(&self) -> f32 {
        self.sample_rate_hz / self.len as f32
    }

    fn bin_frequency(&self, index: usize) -> f32 {
        index as f32 * self.sample_rate_hz / self.len as f32
    }

    /// Analyse one window. Slots past the window's write cursor contribute
    /// zero, so the result is defined even for a partial window.
    pub fn analyze(&mut self, window: &AnalysisWindow, scale: i16) -> SpectralResult {
        let n = self.len;
        if n < 4 {
            return SpectralResult::default();
        }
        let valid = window.len().min(n);

        // 1) integer per-axis mean
        let (mut sx, mut sy, mut sz) = (0i32, 0i32, 0i32);
        for s in &window.samples()[..valid] {
            sx += s.x as i32;
            sy += s.y as i32;
            sz += s.z as i32;
        }
        let count = valid.max(1) as i32;
        let (mx, my, mz) = (sx / count, sy / count, sz / count);

        // 2) signed combined motion signal
        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let s = if i < valid {
                let q = window.get(i);
                delta(q.x, mx, scale) + delta(q.y, my, scale) + delta(q.z, mz, scale)
            } else {
                0.0
            };
            *slot = Complex::new(s, 0.0);
        }

        // 3) residual DC
        let mean = self.buffer.iter().map(|c| c.re).sum::<f32>() / n as f32;
        for (slot, w) in self.buffer.iter_mut().zip(&self.hamming) {
            // 4) taper
            slot.re = (slot.re - mean) * w;
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        // 5) band sums over 1..N/2
        let half = n / 2;
        let mut r = SpectralResult::default();
        for i in 1..half {
            let f = self.bin_frequency(i);
            let p = self.buffer[i].norm_sqr();
            self.power[i] = p;

            r.total_power += p;
            if f < SLOW_BAND_MAX_HZ {
                r.slow_power += p;
            }
            if (TREMOR_BAND_MIN_HZ..DYSKINESIA_BAND_MIN_HZ).contains(&f) {
                r.tremor_power += p;
            } else if (DYSKINESIA_BAND_MIN_HZ..=DYSKINESIA_BAND_MAX_HZ).contains(&f) {
                r.dyskinesia_power += p;
            }
            if (TREMOR_BAND_MIN_HZ..=DYSKINESIA_BAND_MAX_HZ).contains(&f) {
                r.band37_power += p;
                if p > r.peak_power {
                    r.peak_power = p;
                    r.peak_index = Some(i);
                    r.peak_frequency_hz = f;
                }
            }
        }

        // 6) peak sharpness against its two neighbours
        if let Some(k) = r.peak_index {
            if k > 1 && k + 1 < half {
                let neighbours = 0.5 * (self.power[k - 1] + self.power[k + 1]);
                if neighbours > 0.0 {
                    r.peakiness = r.peak_power / neighbours;
                }
            }
        }

        r
    }
}

/// Mean-removed axis value in m/s². The difference stays in i32: it can
/// exceed the i16 range when the axis swings rail to rail.
#[inline]
fn delta(q: i16, mean: i32, scale: i16) -> f32 {
    let scale = if scale == 0 { 1.0 } else { scale as f32 };
    (q as i32 - mean) as f32 / scale
}

/// Symmetric Hamming window, `0.54 - 0.46 cos(2πi/(N-1))`.
fn hamming(len: usize) -> Vec<f32> {
    if len < 2 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f32;
    (0..len)
        .map(|i| 0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::quantize::quantize;
    use crate::analysis::window::QuantizedSample;
    use approx::assert_abs_diff_eq;

    const N: usize = 64;
    const FS: f32 = 64.0 / 3.0;

    fn sine_window(freq_hz: f32, amplitude: f32) -> AnalysisWindow {
        let mut window = AnalysisWindow::new(N);
        for i in 0..N {
            let t = i as f32 / FS;
            let a = amplitude * (2.0 * std::f32::consts::PI * freq_hz * t).sin();
            window.push(QuantizedSample {
                x: quantize(a, 1024),
                y: quantize(0.8 * a, 1024),
                z: quantize(9.81 + 0.4 * a, 1024),
            });
        }
        window
    }

    #[test]
    fn four_hz_lands_in_tremor_band() {
        let mut analyzer = SpectralAnalyzer::new(N, FS);
        let r = analyzer.analyze(&sine_window(4.0, 1.0), 1024);

        assert!(r.tremor_power > r.dyskinesia_power * CLASS_MARGIN);
        assert!((r.peak_frequency_hz - 4.0).abs() <= analyzer.frequency_resolution());
        assert_eq!(r.peak_index, Some(12));
        assert!(r.peakiness > 1.0);
    }

    #[test]
    fn six_hz_lands_in_dyskinesia_band() {
        let mut analyzer = SpectralAnalyzer::new(N, FS);
        let r = analyzer.analyze(&sine_window(6.0, 1.0), 1024);

        assert!(r.dyskinesia_power > r.tremor_power * CLASS_MARGIN);
        assert!((r.peak_frequency_hz - 6.0).abs() <= analyzer.frequency_resolution());
    }

    #[test]
    fn slow_tilt_lands_in_slow_band() {
        let mut analyzer = SpectralAnalyzer::new(N, FS);
        let r = analyzer.analyze(&sine_window(1.0, 1.0), 1024);
        assert!(r.slow_power > r.band37_power);
    }

    #[test]
    fn gravity_only_window_has_no_power() {
        let mut analyzer = SpectralAnalyzer::new(N, FS);
        let r = analyzer.analyze(&sine_window(4.0, 0.0), 1024);
        assert_abs_diff_eq!(r.total_power, 0.0);
        assert_eq!(r.peak_index, None);
        assert_abs_diff_eq!(r.peakiness, 0.0);
    }

    #[test]
    fn empty_window_is_well_defined() {
        let mut analyzer = SpectralAnalyzer::new(N, FS);
        let r = analyzer.analyze(&AnalysisWindow::new(N), 0);
        assert_eq!(r, SpectralResult::default());
    }

    #[test]
    fn powers_are_non_negative_and_bands_within_total() {
        let mut analyzer = SpectralAnalyzer::new(N, FS);
        let r = analyzer.analyze(&sine_window(5.3, 0.7), 1024);
        for p in [r.tremor_power, r.dyskinesia_power, r.slow_power, r.band37_power] {
            assert!(p >= 0.0);
            assert!(p <= r.total_power + 1e-3);
        }
        assert_abs_diff_eq!(
            r.band37_power,
            r.tremor_power + r.dyskinesia_power,
            epsilon = 1e-3 * r.total_power
        );
    }

    #[test]
    fn bin_edges_are_exact_at_default_rate() {
        let analyzer = SpectralAnalyzer::new(N, FS);
        assert_eq!(analyzer.bin_frequency(9), 3.0);
        assert_eq!(analyzer.bin_frequency(15), 5.0);
        assert_eq!(analyzer.bin_frequency(21), 7.0);
    }

    #[test]
    fn rail_to_rail_deviation_is_not_clipped() {
        assert_abs_diff_eq!(delta(i16::MIN, 20_000, 1024), -52_768.0 / 1024.0);
        assert_abs_diff_eq!(delta(i16::MAX, -20_000, 1024), 52_767.0 / 1024.0);
        assert_abs_diff_eq!(delta(5, 2, 0), 3.0);
    }

    #[test]
    fn hamming_is_symmetric() {
        let w = hamming(8);
        assert_abs_diff_eq!(w[0], 0.08, epsilon = 1e-6);
        for i in 0..4 {
            assert_abs_diff_eq!(w[i], w[7 - i], epsilon = 1e-6);
        }
    }
}
