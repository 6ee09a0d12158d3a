// TremorWatch — Firmware Entry Point
//
// Boot sequence (watch):
//   1. Bring up the I2C bus and the ADXL345, retrying a bounded number of
//      times. If the sensor never answers, halt instead of classifying
//      garbage.
//   2. Build the movement engine from the compile-time configuration.
//   3. Spawn the monitor task (sampling + analysis) and the UI task.
//
// On the host the same engine runs against a synthetic accelerometer with a
// simulated clock, walking through rest → tremor → dyskinesia → rest.

mod tasks;

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tremorwatch::analysis::MovementEngine;
use tremorwatch::config::*;
use tremorwatch::drivers::init_with_retry;

// ---------------------------------------------------------------------------
// Utility: microseconds since boot
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
pub fn now_us() -> u64 {
    unsafe { esp_idf_sys::esp_timer_get_time() as u64 }
}

// ---------------------------------------------------------------------------
// Main (watch)
// ---------------------------------------------------------------------------
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;
    use tremorwatch::drivers::adxl345::Adxl345;

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();
    log::info!("TremorWatch firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // ---- I2C bus + accelerometer ------------------------------------------
    let i2c_config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6, // SDA
        peripherals.pins.gpio7, // SCL
        &i2c_config,
    )?;
    log::info!("I2C up (SDA GPIO{}, SCL GPIO{})", PIN_I2C_SDA, PIN_I2C_SCL);

    let mut sensor = Adxl345::new(i2c);
    if let Err(e) = init_with_retry(
        &mut sensor,
        SENSOR_INIT_ATTEMPTS,
        Duration::from_millis(SENSOR_INIT_RETRY_MS),
        thread::sleep,
    ) {
        log::error!("{} — halting", e);
        halt();
    }

    // ---- Engine -----------------------------------------------------------
    let engine = MovementEngine::new(EngineConfig::default())?;

    // ---- Spawn tasks (map to FreeRTOS tasks via std::thread) ---------------
    let (ui_tx, ui_rx) = mpsc::channel();

    thread::Builder::new()
        .name("ui".into())
        .stack_size(STACK_UI)
        .spawn(move || {
            tasks::ui::ui_task(ui_rx);
        })?;

    thread::Builder::new()
        .name("monitor".into())
        .stack_size(STACK_MONITOR)
        .spawn(move || {
            tasks::monitor::monitor_task(engine, sensor, ui_tx);
        })?;

    // Main thread has nothing left to do — park it forever.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}

/// Fatal init failure: stay alive (serial log remains readable) but never
/// sample. Does not return.
#[cfg(target_os = "espidf")]
fn halt() -> ! {
    loop {
        thread::sleep(Duration::from_secs(1));
    }
}

// ---------------------------------------------------------------------------
// Main (host simulator)
// ---------------------------------------------------------------------------
#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use tremorwatch::drivers::synthetic::{SyntheticAccel, Tone};
    use tremorwatch::monitor::Monitor;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("TremorWatch host simulator starting…");

    let config = EngineConfig::default();

    // First probe fails, as a cold ADXL345 sometimes does.
    let mut sensor = SyntheticAccel::new(config.native_rate_hz)
        .with_noise(0.05, 0x7e57)
        .failing_inits(1);
    init_with_retry(
        &mut sensor,
        SENSOR_INIT_ATTEMPTS,
        Duration::from_millis(SENSOR_INIT_RETRY_MS),
        |_| {},
    )?;

    let engine = MovementEngine::new(config)?;

    let (ui_tx, ui_rx) = mpsc::channel();
    let ui = thread::Builder::new()
        .name("ui".into())
        .spawn(move || tasks::ui::ui_task(ui_rx))?;

    let scenario = [
        ("rest", 6u64, vec![]),
        ("tremor 4.5 Hz", 12, vec![Tone::new(4.5, 0.8)]),
        ("dyskinesia 6 Hz", 12, vec![Tone::new(6.0, 1.2)]),
        ("rest", 6, vec![]),
    ];

    let mut monitor = Monitor::new(engine, sensor, ui_tx);
    let step_us = MONITOR_POLL_INTERVAL_MS * 1000;
    let mut now_us = 0u64;
    monitor.start(now_us);

    for (label, seconds, tones) in &scenario {
        log::info!("Scenario: {} for {} s", label, seconds);
        monitor.sensor_mut().set_tones(tones);
        let end_us = now_us + seconds * 1_000_000;
        while now_us < end_us {
            monitor.poll(now_us)?;
            now_us += step_us;
        }
    }

    // Dropping the monitor closes the UI channel.
    drop(monitor);
    ui.join().map_err(|_| anyhow::anyhow!("UI task panicked"))?;
    log::info!("Simulation finished");
    Ok(())
}
