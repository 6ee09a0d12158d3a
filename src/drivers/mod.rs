// TremorWatch — Accelerometer Drivers
//
// `AccelSensor` is the seam between the analysis core and whatever produces
// acceleration readings: the ADXL345 on the watch, or a synthetic signal on
// the host.

#[cfg(target_os = "espidf")]
pub mod adxl345;
pub mod synthetic;

use std::time::Duration;

use thiserror::Error;

use crate::events::RawSample;

pub trait AccelSensor {
    /// Probe and configure the device.
    fn init(&mut self) -> anyhow::Result<()>;

    /// One reading in m/s².
    fn read_sample(&mut self) -> anyhow::Result<RawSample>;
}

impl<S: AccelSensor + ?Sized> AccelSensor for &mut S {
    fn init(&mut self) -> anyhow::Result<()> {
        (**self).init()
    }

    fn read_sample(&mut self) -> anyhow::Result<RawSample> {
        (**self).read_sample()
    }
}

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("accelerometer not detected after {attempts} attempts: {last}")]
    NotDetected { attempts: u32, last: anyhow::Error },
}

/// Try `sensor.init()` up to `attempts` times, calling `delay` between
/// failures. Exhaustion is fatal for the caller.
pub fn init_with_retry<S, D>(
    sensor: &mut S,
    attempts: u32,
    retry_delay: Duration,
    mut delay: D,
) -> Result<(), SensorError>
where
    S: AccelSensor + ?Sized,
    D: FnMut(Duration),
{
    let attempts = attempts.max(1);
    let mut tries = 0;
    loop {
        tries += 1;
        match sensor.init() {
            Ok(()) => {
                log::info!("Accelerometer ready after {} attempt(s)", tries);
                return Ok(());
            }
            Err(e) if tries >= attempts => {
                return Err(SensorError::NotDetected {
                    attempts: tries,
                    last: e,
                });
            }
            Err(e) => {
                log::warn!("Accelerometer init failed ({}), retrying…", e);
                delay(retry_delay);
            }
        }
    }
}
