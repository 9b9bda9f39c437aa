//! Auxiliary 5 V rail enable.
//!
//! Generic over any `embedded_hal` output pin so the same driver runs on
//! an ESP-IDF `PinDriver` and on a host test double.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

pub struct AuxPower<P: OutputPin> {
    pin: P,
    enabled: bool,
}

impl<P: OutputPin> AuxPower<P> {
    /// Take ownership of `pin` and switch the rail off.
    pub fn new(pin: P) -> Self {
        let mut aux = Self { pin, enabled: true };
        aux.set(false);
        aux
    }

    pub fn set(&mut self, on: bool) {
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        match res {
            Ok(()) => {
                if self.enabled != on {
                    info!("aux 5V rail {}", if on { "on" } else { "off" });
                }
                self.enabled = on;
            }
            Err(e) => warn!("aux 5V rail: pin write failed: {:?}", e),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
