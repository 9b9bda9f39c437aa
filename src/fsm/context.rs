//! Shared mutable context threaded through every screen handler.
//!
//! `FsmContext` is the single struct that screen handlers read from and
//! write to: the selected inverter profile, power state, list cursor, help
//! scroll position and the user-facing safety settings.  Think of it as the
//! "blackboard" in a blackboard architecture.  Anything written by timer
//! callbacks lives in [`TimerShared`](crate::timers::TimerShared) instead.

use serde::Serialize;

use super::ScreenId;
use super::cursor::ListCursor;
use crate::config::ControllerConfig;
use crate::control::modes::{IDLE_MODE, ModeId};
use crate::ui::help::{self, HelpLayout};

// ---------------------------------------------------------------------------
// Inverter profile
// ---------------------------------------------------------------------------

/// Which inverter family is being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InverterProfile {
    Embraco,
    Samsung,
}

impl InverterProfile {
    /// Selection order on the boot screen.
    pub const ALL: [InverterProfile; 2] = [Self::Embraco, Self::Samsung];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Embraco => "Embraco",
            Self::Samsung => "Samsung",
        }
    }

    /// Samsung boards take their logic supply from the auxiliary 5 V rail.
    pub const fn needs_aux_power(self) -> bool {
        matches!(self, Self::Samsung)
    }

    /// Profile listed at `row` on the boot screen.
    pub fn from_row(row: u8) -> Self {
        Self::ALL.get(row as usize).copied().unwrap_or(Self::Embraco)
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every screen handler function.
pub struct FsmContext {
    // -- Selection --
    /// Active inverter profile.
    pub profile: InverterProfile,
    /// True only after the user confirmed power-on.
    pub powered: bool,
    /// Meaningful only while `powered`.
    pub active_mode: ModeId,

    // -- Navigation --
    /// Cursor of the current list screen.
    pub cursor: ListCursor,
    /// First help line shown.
    pub help_top_line: u8,

    // -- Settings --
    /// Auto-stop non-idle modes after their runtime budget.
    pub limit_runtime: bool,
    /// Stored and shown; no behavioural effect yet.
    pub arrow_captcha: bool,

    // -- Configuration --
    pub config: ControllerConfig,
}

impl FsmContext {
    /// Create the boot context: Embraco, unpowered, idle.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            profile: InverterProfile::Embraco,
            powered: false,
            active_mode: IDLE_MODE,
            cursor: ListCursor::default(),
            help_top_line: 0,
            limit_runtime: config.limit_runtime_default,
            arrow_captcha: config.arrow_captcha_default,
            config,
        }
    }

    /// Help scroll geometry for the active profile.
    pub fn help_layout(&self) -> HelpLayout {
        HelpLayout::compute(
            help::lines(self.profile).len(),
            self.config.screen_height_px,
            self.config.help_top_margin_px,
            self.config.help_line_height_px,
        )
    }
}

// ---------------------------------------------------------------------------
// Observable snapshot
// ---------------------------------------------------------------------------

/// Point-in-time view of everything the UI and tests can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplicationState {
    pub screen: ScreenId,
    pub profile: InverterProfile,
    pub powered: bool,
    pub cursor: ListCursor,
    pub active_mode: ModeId,
    pub help_top_line: u8,
    pub limit_runtime: bool,
    pub arrow_captcha: bool,
    pub remaining_ms: u32,
    pub timeout_expired: bool,
    pub indicator_on: bool,
    pub hint_visible: bool,
}
