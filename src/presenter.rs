// TremorWatch — Presentation Seam
//
// The analysis core never draws anything. It hands results to a `Presenter`;
// on the watch that is the UI task's channel.

use std::sync::mpsc::Sender;

use crate::events::{ClassificationUpdate, UiEvent};

pub trait Presenter {
    /// Once per analysis period.
    fn on_classification_update(&mut self, update: &ClassificationUpdate);

    /// Once per sampling period, value in [-1, 1].
    fn on_waveform_sample(&mut self, value: f32);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn on_classification_update(&mut self, update: &ClassificationUpdate) {
        (**self).on_classification_update(update)
    }

    fn on_waveform_sample(&mut self, value: f32) {
        (**self).on_waveform_sample(value)
    }
}

/// Forward to the UI task. A closed channel only means the UI is gone, so
/// send errors are ignored.
impl Presenter for Sender<UiEvent> {
    fn on_classification_update(&mut self, update: &ClassificationUpdate) {
        let _ = self.send(UiEvent::Classification(*update));
    }

    fn on_waveform_sample(&mut self, value: f32) {
        let _ = self.send(UiEvent::Waveform(value));
    }
}

/// Writes each update to the log; waveform samples are dropped.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn on_classification_update(&mut self, u: &ClassificationUpdate) {
        log::info!(
            "{:<10} {:>5.2} Hz  tremor {:>8.1}  dysk {:>8.1}  energy {:.3}  missed {}",
            u.status.display_name(),
            u.dominant_frequency_hz,
            u.tremor_power,
            u.dyskinesia_power,
            u.overall_energy,
            u.missed_sample_periods
        );
    }

    fn on_waveform_sample(&mut self, _value: f32) {}
}
