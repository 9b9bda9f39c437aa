//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (output stage, timers, indicator, dialogs, renderers,
//! event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics, so
//! the domain core never touches hardware directly.
//!
//! ## Safety notes
//!
//! - **ActuatorPort** primitives must be idempotent: the controller calls
//!   `stop_signal` before every reconfiguration, running or not.
//! - **TimerPort** `start_*` on a running timer restarts it with the new
//!   period; `stop` on an idle timer is a no-op.
//! - **IndicatorPort** is invoked from timer callback context and therefore
//!   takes `&self` and must be `Send + Sync`.

use crate::fsm::context::InverterProfile;
use crate::timers::TimerId;
use crate::ui::ScreenView;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → output stage)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the signal pin and the
/// auxiliary supply rail.
pub trait ActuatorPort {
    /// Put the signal pin in high-impedance (electrically disconnected).
    fn disconnect_output(&mut self);

    /// Drive the signal pin to its safe idle level (push-pull low).
    fn force_output_safe_level(&mut self);

    /// Start a 50% duty square wave at `freq_hz` on the signal pin.
    fn start_signal(&mut self, freq_hz: u32);

    /// Stop the square wave if running, then wait the settle delay.
    fn stop_signal(&mut self);

    /// Switch the auxiliary 5 V rail.
    fn set_aux_power(&mut self, on: bool);

    /// Raise the aux rail if `profile` draws its logic supply from it.
    /// Never switches the rail off; that is `set_aux_power(false)`.
    fn enable_profile_power(&mut self, profile: InverterProfile) {
        if profile.needs_aux_power() {
            self.set_aux_power(true);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: domain → software timers)
// ───────────────────────────────────────────────────────────────

/// Four software timers identified by [`TimerId`].  Firing is routed to
/// [`TimerShared::on_fire`](crate::timers::TimerShared::on_fire) by the
/// adapter, never back through this trait.
pub trait TimerPort {
    /// (Re)start `id` as a periodic timer.
    fn start_periodic(&mut self, id: TimerId, period_ms: u32);

    /// (Re)start `id` as a one-shot timer.
    fn start_once(&mut self, id: TimerId, delay_ms: u32);

    /// Stop `id`.  Idempotent.
    fn stop(&mut self, id: TimerId);
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: timer context → status LED)
// ───────────────────────────────────────────────────────────────

/// Single-colour status indicator.
pub trait IndicatorPort: Send + Sync {
    fn set_indicator(&self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Confirm port (driven adapter: domain ↔ modal dialog)
// ───────────────────────────────────────────────────────────────

/// Safety prompts shown before energising or unguarding the compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Prompt {
    /// Before the first power-on from the unpowered menu.
    PowerOn,
    /// Before turning the runtime limit off.
    DisableRuntimeLimit,
}

impl Prompt {
    pub const fn header(self) -> &'static str {
        "Alert"
    }

    pub const fn body(self) -> &'static str {
        match self {
            Self::PowerOn => "Check your wiring!\nAll pins will be activated!\nCheck help!",
            Self::DisableRuntimeLimit => {
                "Long run without condenser\nand evaporator fans may\ndamage compressor parts."
            }
        }
    }

    /// Label of the declining (left) button.
    pub const fn cancel_label(self) -> &'static str {
        "Cancel"
    }

    /// Label of the accepting (right) button.
    pub const fn confirm_label(self) -> &'static str {
        "Confirm"
    }
}

/// Blocking two-button dialog.  Returns `true` only on explicit confirm.
pub trait ConfirmPort {
    fn confirm(&mut self, prompt: Prompt) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Render port (driven adapter: domain → display)
// ───────────────────────────────────────────────────────────────

/// Draws a fully-resolved [`ScreenView`].  Rendering never mutates state.
pub trait RenderPort {
    fn render(&mut self, view: &ScreenView);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
