//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::modes;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(screen) => {
                info!("START | initial_screen={:?}", screen);
            }
            AppEvent::ScreenChanged { from, to } => {
                info!("SCREEN | {:?} -> {:?}", from, to);
            }
            AppEvent::ProfileSelected(profile) => {
                info!("PROFILE | {}", profile.name());
            }
            AppEvent::SafeEntered => {
                info!("OUTPUT | safe (signal off, pin hi-z, aux off)");
            }
            AppEvent::PoweredOn(profile) => {
                info!("OUTPUT | {} powered, idle", profile.name());
            }
            AppEvent::ModeApplied { mode, pwm_hz } => {
                info!("MODE | {} ({}) @ {} Hz", mode, modes::label(*mode), pwm_hz);
            }
            AppEvent::CountdownArmed { mode, duration_ms } => {
                info!("TIMER | {} limited to {} s", modes::label(*mode), duration_ms / 1000);
            }
            AppEvent::CountdownExpired { mode } => {
                warn!("TIMER | {} expired, back to idle", modes::label(*mode));
            }
            AppEvent::RuntimeLimitChanged(on) => {
                info!("SETTINGS | limit run time = {}", if *on { "Yes" } else { "No" });
            }
            AppEvent::ConfirmDeclined(prompt) => {
                info!("PROMPT | {:?} declined", prompt);
            }
            AppEvent::Shutdown => {
                info!("EXIT | outputs released");
            }
        }
    }
}
