//! Indicator blink control.
//!
//! The indicator toggles every `500 / rate` ms so the visible blink
//! frequency equals the mode's rate.  Every change tears the blink timer
//! down and turns the indicator off before rebuilding, so a rate change
//! never leaves the LED latched on.

use log::debug;

use crate::app::ports::TimerPort;
use crate::timers::{TimerId, TimerShared};

/// Toggle period for `rate_hz`, clamped to at least 1 ms.  `None` for 0.
pub fn toggle_period_ms(rate_hz: u8) -> Option<u32> {
    if rate_hz == 0 {
        None
    } else {
        Some((500 / u32::from(rate_hz)).max(1))
    }
}

#[derive(Debug, Default)]
pub struct IndicatorBlink {
    rate_hz: u8,
}

impl IndicatorBlink {
    pub const fn new() -> Self {
        Self { rate_hz: 0 }
    }

    /// Apply a blink rate.  0 leaves the indicator off.
    pub fn apply(&mut self, rate_hz: u8, timers: &mut impl TimerPort, shared: &TimerShared) {
        timers.stop(TimerId::IndicatorBlink);
        shared.set_indicator(false);
        self.rate_hz = rate_hz;

        if let Some(period) = toggle_period_ms(rate_hz) {
            timers.start_periodic(TimerId::IndicatorBlink, period);
            debug!("indicator: blinking at {} Hz (toggle every {} ms)", rate_hz, period);
        }
    }

    pub fn stop(&mut self, timers: &mut impl TimerPort, shared: &TimerShared) {
        self.apply(0, timers, shared);
    }

    pub fn rate_hz(&self) -> u8 {
        self.rate_hz
    }
}
