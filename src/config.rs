// TremorWatch — Hardware, Timing & Analysis Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V) + ADXL345 accelerometer

use thiserror::Error;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_I2C_SDA: i32 = 6;     // D4    — I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // D5    — I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_ADXL345: u8 = 0x53;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks
pub const I2C_BAUDRATE_KHZ: u32 = 400;

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_MONITOR: usize = 16384; // FFT scratch + window live here
pub const STACK_UI: usize = 4096;

// ---------------------------------------------------------------------------
// Sensor bring-up
// ---------------------------------------------------------------------------
pub const SENSOR_INIT_ATTEMPTS: u32 = 5;
pub const SENSOR_INIT_RETRY_MS: u64 = 500;

// ADXL345 at ±2 g, full resolution: 3.9 mg/LSB
pub const ACCEL_MG_PER_LSB: f32 = 3.9;
pub const STANDARD_GRAVITY: f32 = 9.806_65;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------
pub const NATIVE_SAMPLE_RATE_HZ: u32 = 52;                 // ≈ 19.23 ms period
pub const WINDOW_DURATION_MS: u32 = 3000;                  // one analysis period
pub const MAX_CATCH_UP_SAMPLES: u32 = 8;                   // per scheduling pass
pub const ANALYSIS_RETRY_MS: u32 = 20;                     // incomplete window → retry
pub const MONITOR_POLL_INTERVAL_MS: u64 = 5;

// ---------------------------------------------------------------------------
// Spectral analysis
// ---------------------------------------------------------------------------
pub const MAX_WINDOW_LEN: usize = 256;                     // compile-time capacity
pub const WINDOW_LEN: usize = 64;                          // FFT size N
pub const FIXED_POINT_SCALE: i16 = 1024;                   // Q10

pub const SLOW_BAND_MAX_HZ: f32 = 2.0;
pub const TREMOR_BAND_MIN_HZ: f32 = 3.0;
pub const DYSKINESIA_BAND_MIN_HZ: f32 = 5.0;               // tremor/dyskinesia split
pub const DYSKINESIA_BAND_MAX_HZ: f32 = 7.0;

// Rhythmicity gate
pub const BAND_SHARE_MIN: f32 = 0.06;
pub const DOMINANCE_RATIO_MIN: f32 = 0.14;
pub const PEAKINESS_MIN: f32 = 1.00;
pub const SLOW_REJECT_MUL: f32 = 0.65;

// Rest hysteresis, Q10 units of (m/s²)²
pub const REST_ENTER_ENERGY_Q: i32 = 20;
pub const REST_EXIT_ENERGY_Q: i32 = 40;

// Debounce
pub const CLASS_MARGIN: f32 = 1.15;
pub const CONFIRM_THRESHOLD: u8 = 2;

// Live waveform (display only)
pub const WAVEFORM_HIGH_PASS_ALPHA: f32 = 0.9;
pub const WAVEFORM_FULL_SCALE: f32 = 2.0;                  // m/s² mapped to ±1
pub const WAVEFORM_HISTORY_LEN: usize = 64;                // samples kept by the UI

// ---------------------------------------------------------------------------
// Runtime view of the constants above
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window length {0} must be a power of two between 4 and {max}", max = MAX_WINDOW_LEN)]
    WindowLength(usize),
    #[error("native sample rate must be non-zero")]
    SampleRate,
    #[error("window of {duration_ms} ms at {rate_hz} Hz yields {available} raw samples, fewer than {required}")]
    TooFewRawSamples {
        duration_ms: u32,
        rate_hz: u32,
        available: u32,
        required: usize,
    },
    #[error("fixed-point scale must be positive, got {0}")]
    Scale(i16),
    #[error("rest enter threshold {enter} must be below exit threshold {exit}")]
    RestThresholds { enter: i32, exit: i32 },
    #[error("confirmation threshold must be at least 1")]
    ConfirmThreshold,
}

/// Which accelerometer axis feeds the live waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateThresholds {
    pub band_share_min: f32,
    pub dominance_ratio_min: f32,
    pub peakiness_min: f32,
    pub slow_reject_mul: f32,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            band_share_min: BAND_SHARE_MIN,
            dominance_ratio_min: DOMINANCE_RATIO_MIN,
            peakiness_min: PEAKINESS_MIN,
            slow_reject_mul: SLOW_REJECT_MUL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestThresholds {
    /// Energy below this while active → resting.
    pub enter: i32,
    /// Energy above this while resting → active.
    pub exit: i32,
}

impl Default for RestThresholds {
    fn default() -> Self {
        Self {
            enter: REST_ENTER_ENERGY_Q,
            exit: REST_EXIT_ENERGY_Q,
        }
    }
}

/// Everything the engine needs, fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub native_rate_hz: u32,
    pub window_duration_ms: u32,
    pub window_len: usize,
    pub scale: i16,
    pub gate: GateThresholds,
    pub rest: RestThresholds,
    pub class_margin: f32,
    pub confirm_threshold: u8,
    pub max_catch_up: u32,
    pub analysis_retry_ms: u32,
    pub waveform_axis: Axis,
    pub waveform_alpha: f32,
    pub waveform_full_scale: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            native_rate_hz: NATIVE_SAMPLE_RATE_HZ,
            window_duration_ms: WINDOW_DURATION_MS,
            window_len: WINDOW_LEN,
            scale: FIXED_POINT_SCALE,
            gate: GateThresholds::default(),
            rest: RestThresholds::default(),
            class_margin: CLASS_MARGIN,
            confirm_threshold: CONFIRM_THRESHOLD,
            max_catch_up: MAX_CATCH_UP_SAMPLES,
            analysis_retry_ms: ANALYSIS_RETRY_MS,
            waveform_axis: Axis::X,
            waveform_alpha: WAVEFORM_HIGH_PASS_ALPHA,
            waveform_full_scale: WAVEFORM_FULL_SCALE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.window_len;
        if !n.is_power_of_two() || !(4..=MAX_WINDOW_LEN).contains(&n) {
            return Err(ConfigError::WindowLength(n));
        }
        if self.native_rate_hz == 0 {
            return Err(ConfigError::SampleRate);
        }
        let available = self.raw_samples_per_window();
        if (available as usize) < n {
            return Err(ConfigError::TooFewRawSamples {
                duration_ms: self.window_duration_ms,
                rate_hz: self.native_rate_hz,
                available,
                required: n,
            });
        }
        if self.scale <= 0 {
            return Err(ConfigError::Scale(self.scale));
        }
        if self.rest.enter >= self.rest.exit {
            return Err(ConfigError::RestThresholds {
                enter: self.rest.enter,
                exit: self.rest.exit,
            });
        }
        if self.confirm_threshold == 0 {
            return Err(ConfigError::ConfirmThreshold);
        }
        Ok(())
    }

    /// Raw sensor samples expected in one window (156 by default).
    pub fn raw_samples_per_window(&self) -> u32 {
        ((self.native_rate_hz as u64 * self.window_duration_ms as u64) / 1000) as u32
    }

    /// Rate of the resampled window seen by the FFT.
    pub fn analysis_rate_hz(&self) -> f32 {
        self.window_len as f32 * 1000.0 / self.window_duration_ms as f32
    }

    pub fn sample_period_us(&self) -> u64 {
        1_000_000 / self.native_rate_hz.max(1) as u64
    }

    pub fn window_period_us(&self) -> u64 {
        self.window_duration_ms as u64 * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.raw_samples_per_window(), 156);
        assert_eq!(config.sample_period_us(), 19_230);
    }

    #[test]
    fn rejects_non_power_of_two_window() {
        let config = EngineConfig {
            window_len: 48,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WindowLength(48)));
    }

    #[test]
    fn rejects_window_larger_than_raw_stream() {
        let config = EngineConfig {
            window_len: 256,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooFewRawSamples { available: 156, .. })
        ));
    }

    #[test]
    fn rejects_inverted_rest_thresholds() {
        let config = EngineConfig {
            rest: RestThresholds { enter: 40, exit: 40 },
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::RestThresholds { .. })));
    }

    #[test]
    fn rejects_zero_confirm_threshold() {
        let config = EngineConfig {
            confirm_threshold: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ConfirmThreshold));
    }
}
