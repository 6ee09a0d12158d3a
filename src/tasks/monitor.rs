// TremorWatch — Monitor Task
//
// Single cooperative loop for sampling and analysis. The poll interval is
// shorter than the sample period; late passes are covered by the bounded
// catch-up in the sample clock.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use tremorwatch::analysis::MovementEngine;
use tremorwatch::config::MONITOR_POLL_INTERVAL_MS;
use tremorwatch::drivers::AccelSensor;
use tremorwatch::events::UiEvent;
use tremorwatch::monitor::Monitor;

pub fn monitor_task<S: AccelSensor>(engine: MovementEngine, sensor: S, ui_tx: Sender<UiEvent>) {
    log::info!("Monitor task started");

    let mut monitor = Monitor::new(engine, sensor, ui_tx);
    monitor.start(crate::now_us());

    let interval = Duration::from_millis(MONITOR_POLL_INTERVAL_MS);
    let mut reported_missed = 0;

    loop {
        match monitor.poll(crate::now_us()) {
            Ok(Some(update)) if update.missed_sample_periods > reported_missed => {
                log::warn!(
                    "{} sample period(s) lost to scheduling delays",
                    update.missed_sample_periods - reported_missed
                );
                reported_missed = update.missed_sample_periods;
            }
            Ok(_) => {}
            Err(e) => log::warn!("Analysis skipped: {}", e),
        }

        thread::sleep(interval);
    }
}
