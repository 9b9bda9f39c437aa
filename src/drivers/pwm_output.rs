//! Inverter speed-signal output.
//!
//! The signal pin has three states: disconnected (Hi-Z), held LOW, or
//! carrying a square wave from the LEDC peripheral.  The LEDC must be
//! stopped before the pin is reconfigured; `stop()` waits a short settle
//! delay afterwards so the peripheral has released the pad.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the pin and LEDC via hw_init.
//! On host/test: hw_init calls are no-ops; state is tracked in-memory.

use log::{debug, warn};
use serde::Serialize;

use crate::drivers::hw_init;

/// Electrical state of the signal pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputState {
    /// Input, no pulls.
    Disconnected,
    /// Driven LOW (LEDC idle level or plain GPIO).
    SafeLow,
    /// Square wave at `freq_hz`.
    Signal { freq_hz: u32 },
}

pub struct PwmOutput {
    state: OutputState,
    duty_percent: u8,
    settle_ms: u32,
}

impl PwmOutput {
    pub fn new(duty_percent: u8, settle_ms: u32) -> Self {
        Self {
            state: OutputState::Disconnected,
            duty_percent: duty_percent.min(100),
            settle_ms,
        }
    }

    /// Float the pin.  Call after [`stop`](Self::stop).
    pub fn disconnect(&mut self) {
        hw_init::signal_pin_hiz();
        self.state = OutputState::Disconnected;
    }

    /// Drive the pin LOW.  Call after [`stop`](Self::stop).
    pub fn force_low(&mut self) {
        hw_init::signal_pin_low();
        self.state = OutputState::SafeLow;
    }

    /// Start the square wave.  A zero frequency means "no signal" and
    /// leaves the pin alone.
    pub fn start(&mut self, freq_hz: u32) {
        if freq_hz == 0 {
            return;
        }
        match hw_init::pwm_start(freq_hz, self.duty_percent) {
            Ok(()) => {
                self.state = OutputState::Signal { freq_hz };
                debug!("pwm: {} Hz @ {}%", freq_hz, self.duty_percent);
            }
            Err(e) => warn!("pwm: start at {} Hz failed: {}", freq_hz, e),
        }
    }

    /// Stop the square wave if one is running.  The pin idles LOW.
    /// Returns `true` if a signal was actually stopped.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        hw_init::pwm_stop();
        hw_init::settle_delay_ms(self.settle_ms);
        self.state = OutputState::SafeLow;
        debug!("pwm: stopped");
        true
    }

    pub fn state(&self) -> OutputState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, OutputState::Signal { .. })
    }
}
