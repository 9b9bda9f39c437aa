//! Commands raised by screen input handlers.
//!
//! Screen handlers only touch navigation state (cursor, scroll, captcha
//! flag).  Anything that reaches the output stage, the timers or a dialog
//! is expressed as an [`AppCommand`] and carried out by the
//! [`AppService`](super::service::AppService).

use crate::control::modes::ModeId;
use crate::fsm::context::InverterProfile;

/// Side-effecting actions requested by the active screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Inverter chosen on the boot screen: enter safe state, open the menu.
    CommitProfile(InverterProfile),

    /// Unpowered menu "Power on": confirm, then power the profile up idle.
    RequestPowerOn,

    /// Powered menu "Power off".
    PowerOff,

    /// Powered menu mode row.
    ApplyMode(ModeId),

    /// Powered menu "Help": drop to safe state before showing help.
    OpenHelpSafely,

    /// Settings "Limit run time" while enabled: confirm before disabling.
    RequestDisableRuntimeLimit,

    /// Settings "Limit run time" while disabled.
    EnableRuntimeLimit,

    /// Settings profile row differing from the active profile.
    SwitchProfile(InverterProfile),

    /// Short Back on a top-level screen: show the exit hint.
    ShowExitHint,
}
