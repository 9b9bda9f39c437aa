//! Single status LED used as the run indicator.
//!
//! Written from the esp_timer task (blink toggles) and from the main loop
//! (forced off), so the pin sits behind a critical-section mutex and the
//! driver implements [`IndicatorPort`] through `&self`.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps a `PinDriver<Output>`.
//! On host/test: any `embedded_hal` output pin.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_hal::digital::{OutputPin, PinState};

use crate::app::ports::IndicatorPort;

pub struct StatusLed<P: OutputPin> {
    pin: Mutex<CriticalSectionRawMutex, RefCell<P>>,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin: Mutex::new(RefCell::new(pin)) }
    }
}

impl<P: OutputPin + Send> IndicatorPort for StatusLed<P> {
    fn set_indicator(&self, on: bool) {
        self.pin.lock(|pin| {
            // A failed LED write is cosmetic; the next toggle retries.
            let _ = pin.borrow_mut().set_state(PinState::from(on));
        });
    }
}
