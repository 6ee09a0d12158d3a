// TremorWatch — Sensor Samples, Symptom Classes & UI Events

// ---------------------------------------------------------------------------
// Sensor Data (3-axis accelerometer reading, m/s²)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RawSample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ---------------------------------------------------------------------------
// Symptom Classification
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymptomClass {
    /// Rhythmic motion centred in 3–5 Hz.
    Tremor,
    /// Rhythmic motion centred in 5–7 Hz.
    Dyskinesia,
}

impl SymptomClass {
    /// Nominal frequency used as the class label.
    pub fn label_hz(&self) -> u8 {
        match self {
            Self::Tremor => 4,
            Self::Dyskinesia => 6,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Tremor => "Tremor",
            Self::Dyskinesia => "Dyskinesia",
        }
    }
}

/// `0` when no class is present, otherwise the class label.
pub fn class_hz(class: Option<SymptomClass>) -> u8 {
    class.map_or(0, |c| c.label_hz())
}

/// What the watch face shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymptomStatus {
    #[default]
    Resting,
    Normal,
    Tremor,
    Dyskinesia,
}

impl SymptomStatus {
    pub fn from_state(resting: bool, accepted: Option<SymptomClass>) -> Self {
        if resting {
            return Self::Resting;
        }
        match accepted {
            None => Self::Normal,
            Some(SymptomClass::Tremor) => Self::Tremor,
            Some(SymptomClass::Dyskinesia) => Self::Dyskinesia,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Resting => "Resting",
            Self::Normal => "Normal",
            Self::Tremor => "Tremor",
            Self::Dyskinesia => "Dyskinesia",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-window output handed to the presentation layer
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassificationUpdate {
    pub status: SymptomStatus,
    pub accepted_class: Option<SymptomClass>,
    /// Peak frequency of this window if a class is accepted, else 0.
    pub dominant_frequency_hz: f32,
    pub tremor_power: f32,
    pub dyskinesia_power: f32,
    /// Mean-square motion energy of the window, (m/s²)².
    pub overall_energy: f32,
    /// Sample periods dropped by the catch-up cap since boot.
    pub missed_sample_periods: u64,
}

// ---------------------------------------------------------------------------
// UI Events — sent to the UI task via channel
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy)]
pub enum UiEvent {
    /// A new analysis window finished.
    Classification(ClassificationUpdate),
    /// High-passed live waveform value in [-1, 1].
    Waveform(f32),
}
