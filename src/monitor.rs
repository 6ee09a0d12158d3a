// TremorWatch — Monitor
//
// One cooperative scheduling pass: take the due samples, forward the live
// waveform, then analyse (or defer) the window. Sampling and analysis share
// this single thread, so the window needs no locking.

use crate::analysis::{AnalysisError, MovementEngine};
use crate::drivers::AccelSensor;
use crate::events::ClassificationUpdate;
use crate::presenter::Presenter;
use crate::scheduler::{AnalysisClock, AnalysisDecision, SampleClock};

pub struct Monitor<S, P> {
    engine: MovementEngine,
    sensor: S,
    presenter: P,
    samples: SampleClock,
    analysis: AnalysisClock,
    read_errors: u64,
}

impl<S: AccelSensor, P: Presenter> Monitor<S, P> {
    /// `sensor` must already be initialised.
    pub fn new(engine: MovementEngine, sensor: S, presenter: P) -> Self {
        let config = engine.config();
        let samples = SampleClock::new(config.sample_period_us(), config.max_catch_up);
        let analysis = AnalysisClock::new(
            config.window_period_us(),
            config.analysis_retry_ms as u64 * 1000,
        );

        Self {
            engine,
            sensor,
            presenter,
            samples,
            analysis,
            read_errors: 0,
        }
    }

    /// Begin the first window at `now_us`.
    pub fn start(&mut self, now_us: u64) {
        self.engine.begin_window();
        self.analysis.start(now_us);
    }

    /// Run one scheduling pass. Returns the update when a window was analysed.
    pub fn poll(&mut self, now_us: u64) -> Result<Option<ClassificationUpdate>, AnalysisError> {
        for _ in 0..self.samples.due(now_us) {
            match self.sensor.read_sample() {
                Ok(raw) => {
                    let wave = self.engine.on_sample(raw);
                    self.presenter.on_waveform_sample(wave);
                }
                Err(e) => {
                    self.read_errors += 1;
                    log::warn!("Accelerometer read error: {}", e);
                }
            }
        }

        match self.analysis.poll(now_us, self.engine.window_complete()) {
            AnalysisDecision::Idle => Ok(None),
            AnalysisDecision::Defer => {
                log::warn!(
                    "Window short ({}/{}), deferring analysis",
                    self.engine.converter().window().len(),
                    self.engine.config().window_len
                );
                Ok(None)
            }
            AnalysisDecision::Run => {
                let update = self.engine.analyze_window(self.samples.missed_periods())?;
                self.presenter.on_classification_update(&update);
                Ok(Some(update))
            }
        }
    }

    pub fn engine(&self) -> &MovementEngine {
        &self.engine
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn missed_sample_periods(&self) -> u64 {
        self.samples.missed_periods()
    }

    pub fn read_errors(&self) -> u64 {
        self.read_errors
    }

    pub fn deferrals(&self) -> u32 {
        self.analysis.deferrals()
    }
}
