//! Movement-analysis engine.
//!
//! Pipeline per window: rate converter → spectral analyzer → rhythmicity
//! gate, with the rest tracker reading the same window, and the debouncer
//! combining both into a [`ClassificationUpdate`].

pub mod debounce;
pub mod quantize;
pub mod resample;
pub mod rest;
pub mod rhythm;
pub mod spectrum;
pub mod waveform;
pub mod window;

use thiserror::Error;

use crate::config::{ConfigError, EngineConfig};
use crate::events::{ClassificationUpdate, RawSample, SymptomStatus};

use self::debounce::Debouncer;
use self::resample::RateConverter;
use self::rest::RestTracker;
use self::rhythm::MovementAnalysis;
use self::spectrum::{SpectralAnalyzer, SpectralResult};
use self::waveform::WaveformProjector;

pub use self::quantize::{dequantize, quantize};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("window incomplete: {collected} of {required} samples")]
    WindowIncomplete { collected: usize, required: usize },
}

pub struct MovementEngine {
    config: EngineConfig,
    converter: RateConverter,
    analyzer: SpectralAnalyzer,
    rest: RestTracker,
    debouncer: Debouncer,
    waveform: WaveformProjector,
    last_spectrum: SpectralResult,
}

impl MovementEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let converter = RateConverter::new(
            config.raw_samples_per_window(),
            config.window_len,
            config.scale,
        );
        let analyzer = SpectralAnalyzer::new(config.window_len, config.analysis_rate_hz());
        let rest = RestTracker::new(config.rest);
        let debouncer = Debouncer::new(config.class_margin, config.confirm_threshold);
        let waveform = WaveformProjector::new(
            config.waveform_axis,
            config.waveform_alpha,
            config.waveform_full_scale,
        );

        log::info!(
            "Engine ready: {} raw → {} samples per {} ms window ({:.2} Hz bins)",
            config.raw_samples_per_window(),
            config.window_len,
            config.window_duration_ms,
            analyzer.frequency_resolution()
        );

        Ok(Self {
            config,
            converter,
            analyzer,
            rest,
            debouncer,
            waveform,
            last_spectrum: SpectralResult::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Feed one raw sensor reading; returns the live waveform value.
    pub fn on_sample(&mut self, raw: RawSample) -> f32 {
        self.converter.push(raw);
        self.waveform.push(raw)
    }

    pub fn window_complete(&self) -> bool {
        self.converter.is_complete()
    }

    pub fn converter(&self) -> &RateConverter {
        &self.converter
    }

    pub fn rest(&self) -> &RestTracker {
        &self.rest
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Spectrum of the most recently analysed window.
    pub fn last_spectrum(&self) -> &SpectralResult {
        &self.last_spectrum
    }

    /// Spectral analysis plus rhythmicity gate for the current window.
    pub fn movement_analysis(&mut self) -> MovementAnalysis {
        self.last_spectrum = self.analyzer.analyze(self.converter.window(), self.config.scale);
        rhythm::gate(&self.last_spectrum, &self.config.gate)
    }

    /// Analyse the current window and start the next one.
    ///
    /// Refuses to run on an incomplete window; the partial window is kept so
    /// the caller can retry once more samples arrive.
    pub fn analyze_window(
        &mut self,
        missed_sample_periods: u64,
    ) -> Result<ClassificationUpdate, AnalysisError> {
        if !self.converter.is_complete() {
            return Err(AnalysisError::WindowIncomplete {
                collected: self.converter.window().len(),
                required: self.config.window_len,
            });
        }

        let analysis = self.movement_analysis();
        self.rest
            .update_from_window(self.converter.window(), self.config.scale);
        let resting = self.rest.is_resting();
        let accepted = self.debouncer.update(&analysis, resting);

        let update = ClassificationUpdate {
            status: SymptomStatus::from_state(resting, accepted),
            accepted_class: accepted,
            dominant_frequency_hz: self.debouncer.accepted_frequency_hz(),
            tremor_power: analysis.tremor_power,
            dyskinesia_power: analysis.dyskinesia_power,
            overall_energy: dequantize_energy(self.rest.energy(), self.config.scale),
            missed_sample_periods,
        };

        log::debug!(
            "window: trem={:.1} dysk={:.1} peak={:.2} Hz rhythmic={} energy={} → {}",
            analysis.tremor_power,
            analysis.dyskinesia_power,
            analysis.peak_frequency_hz,
            analysis.is_rhythmic,
            self.rest.energy(),
            update.status.display_name()
        );

        self.converter.begin_window();
        Ok(update)
    }

    /// Drop the partial window and start fresh.
    pub fn begin_window(&mut self) {
        self.converter.begin_window();
    }
}

fn dequantize_energy(energy: i32, scale: i16) -> f32 {
    let scale = if scale == 0 { 1.0 } else { scale as f32 };
    energy as f32 / scale
}
