#[cfg(target_os = "espidf")]
pub mod monitor;
pub mod ui;
