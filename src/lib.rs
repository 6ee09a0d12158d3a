// TremorWatch — Movement Analysis Core
//
// Classifies involuntary hand movement (tremor vs. dyskinesia) from a 3-axis
// accelerometer stream:
//   1. Resample the 52 Hz stream into a 64-sample fixed-point window (3 s).
//   2. FFT the signed 3-axis motion signal and sum the 3–5 / 5–7 Hz bands.
//   3. Gate on rhythmicity, suppress while the wrist is at rest.
//   4. Debounce the per-window class before reporting it.
//
// Everything here is plain synchronous code driven by caller timestamps, so
// it runs unchanged on the watch and on the host.

pub mod analysis;
pub mod config;
pub mod drivers;
pub mod events;
pub mod monitor;
pub mod presenter;
pub mod scheduler;
