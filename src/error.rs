//! Unified error type for platform bring-up.
//!
//! The control core itself is infallible: out-of-range ids are no-ops and
//! actuation primitives swallow driver faults after logging them. Only the
//! one-shot peripheral and timer setup in `main` can fail, and those paths
//! funnel into this type. All variants are `Copy` so they can be logged and
//! passed around without allocation.

use core::fmt;

/// Every fallible bring-up operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO could not be configured (ESP-IDF return code).
    Gpio(i32),
    /// The LEDC timer or channel refused the requested configuration.
    Pwm(i32),
    /// An `esp_timer` could not be created or started.
    Timer(i32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(rc) => write!(f, "gpio: config failed (rc={rc})"),
            Self::Pwm(rc) => write!(f, "pwm: ledc config failed (rc={rc})"),
            Self::Timer(rc) => write!(f, "timer: esp_timer call failed (rc={rc})"),
        }
    }
}

impl core::error::Error for Error {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
