//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder).

use crate::app::ports::Prompt;
use crate::control::modes::ModeId;
use crate::fsm::ScreenId;
use crate::fsm::context::InverterProfile;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The application service has started (carries initial screen).
    Started(ScreenId),

    /// The FSM moved between screens.
    ScreenChanged { from: ScreenId, to: ScreenId },

    /// The active inverter profile was set.
    ProfileSelected(InverterProfile),

    /// Outputs are parked: signal stopped, pin disconnected, rail off.
    SafeEntered,

    /// The profile is powered and idling in mode 0.
    PoweredOn(InverterProfile),

    /// A speed mode was applied to the output stage.
    ModeApplied { mode: ModeId, pwm_hz: u32 },

    /// A runtime countdown was armed for the active mode.
    CountdownArmed { mode: ModeId, duration_ms: u32 },

    /// The countdown for `mode` ran out and the output fell back to idle.
    CountdownExpired { mode: ModeId },

    /// The runtime limit setting changed.
    RuntimeLimitChanged(bool),

    /// The user declined a safety prompt.
    ConfirmDeclined(Prompt),

    /// Exit requested; outputs released.
    Shutdown,
}
