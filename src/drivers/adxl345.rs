// TremorWatch — ADXL345 Accelerometer Driver
//
// Register-level driver over the I2C bus. Avoids external crate version
// conflicts with esp-idf-hal.

use esp_idf_hal::i2c::I2cDriver;

use crate::config::*;
use crate::events::RawSample;

use super::AccelSensor;

// ADXL345 register addresses
const REG_DEVID: u8 = 0x00;
const REG_BW_RATE: u8 = 0x2C;
const REG_POWER_CTL: u8 = 0x2D;
const REG_DATA_FORMAT: u8 = 0x31;
const REG_DATAX0: u8 = 0x32; // Start of 6-byte X/Y/Z burst
const DEVID_EXPECTED: u8 = 0xE5;

const BW_RATE_100HZ: u8 = 0x0A;
const POWER_CTL_MEASURE: u8 = 0x08;
const DATA_FORMAT_FULL_RES_2G: u8 = 0x08;

pub struct Adxl345<'d> {
    bus: I2cDriver<'d>,
}

impl<'d> Adxl345<'d> {
    pub fn new(bus: I2cDriver<'d>) -> Self {
        Self { bus }
    }

    /// Verify the device answers with the expected DEVID.
    pub fn is_connected(&mut self) -> bool {
        let mut buf = [0u8; 1];
        match self
            .bus
            .write_read(I2C_ADDR_ADXL345, &[REG_DEVID], &mut buf, I2C_TIMEOUT_TICKS)
        {
            Ok(()) => buf[0] == DEVID_EXPECTED,
            Err(_) => false,
        }
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> anyhow::Result<()> {
        self.bus
            .write(I2C_ADDR_ADXL345, &[reg, value], I2C_TIMEOUT_TICKS)?;
        Ok(())
    }
}

impl AccelSensor for Adxl345<'_> {
    /// Probe, then configure ±2 g full resolution at 100 Hz output rate.
    fn init(&mut self) -> anyhow::Result<()> {
        if !self.is_connected() {
            anyhow::bail!("ADXL345 did not answer at 0x{:02X}", I2C_ADDR_ADXL345);
        }

        self.write_reg(REG_BW_RATE, BW_RATE_100HZ)?;
        self.write_reg(REG_DATA_FORMAT, DATA_FORMAT_FULL_RES_2G)?;
        // Start measuring last so the first sample uses the final format.
        self.write_reg(REG_POWER_CTL, POWER_CTL_MEASURE)?;

        log::info!("ADXL345 initialised (±2g, full-res, 100 Hz ODR)");
        Ok(())
    }

    /// Burst-read the three axes and convert to m/s².
    fn read_sample(&mut self) -> anyhow::Result<RawSample> {
        let mut raw = [0u8; 6];
        self.bus
            .write_read(I2C_ADDR_ADXL345, &[REG_DATAX0], &mut raw, I2C_TIMEOUT_TICKS)?;

        let to_ms2 = |lo: u8, hi: u8| {
            i16::from_le_bytes([lo, hi]) as f32 * ACCEL_MG_PER_LSB * 1e-3 * STANDARD_GRAVITY
        };

        Ok(RawSample {
            x: to_ms2(raw[0], raw[1]),
            y: to_ms2(raw[2], raw[3]),
            z: to_ms2(raw[4], raw[5]),
        })
    }
}
