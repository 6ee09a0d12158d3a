// TremorWatch — UI Task
//
// Stand-in for the display: receives analysis updates and waveform samples
// from the monitor task, keeps the recent waveform history and reports every
// window through the log. Status changes are logged at info level.

use std::sync::mpsc::Receiver;

use tremorwatch::config::WAVEFORM_HISTORY_LEN;
use tremorwatch::events::{SymptomStatus, UiEvent};
use tremorwatch::presenter::{LogPresenter, Presenter};

pub fn ui_task(ui_rx: Receiver<UiEvent>) {
    log::info!("UI task started");

    let mut text = LogPresenter;
    let mut wave = [0.0f32; WAVEFORM_HISTORY_LEN];
    let mut wave_ix: usize = 0;
    let mut status = SymptomStatus::default();

    // Blocks until the monitor task drops its sender.
    while let Ok(event) = ui_rx.recv() {
        match event {
            UiEvent::Waveform(v) => {
                wave_ix = (wave_ix + 1) % WAVEFORM_HISTORY_LEN;
                wave[wave_ix] = v.clamp(-1.0, 1.0);
            }

            UiEvent::Classification(update) => {
                if update.status != status {
                    log::info!(
                        "Status: {} → {}",
                        status.display_name(),
                        update.status.display_name()
                    );
                    status = update.status;
                }
                text.on_classification_update(&update);

                let (lo, hi) = wave
                    .iter()
                    .fold((1.0f32, -1.0f32), |(lo, hi), &v| (lo.min(v), hi.max(v)));
                log::debug!("waveform swing {:.2}", hi - lo);
            }
        }
    }

    log::warn!("UI channel closed — exiting UI task");
}
