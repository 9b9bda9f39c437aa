//! Speed mode table.
//!
//! Mode 0 is the idle mode: no signal, pin held at its safe level.  Every
//! other mode drives a fixed-frequency square wave and carries a default
//! runtime budget enforced by the countdown.

/// Index into [`MODES`].
pub type ModeId = u8;

/// The idle mode.
pub const IDLE_MODE: ModeId = 0;

/// One entry of the speed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    pub name: &'static str,
    /// Square-wave frequency; 0 means no signal.
    pub pwm_hz: u32,
    /// Indicator blink rate; 0 means indicator off.
    pub blink_hz: u8,
    /// Runtime budget while the limit is enabled.
    pub default_timeout_secs: u32,
}

impl Mode {
    pub const fn is_idle(&self) -> bool {
        self.pwm_hz == 0
    }

    pub const fn timeout_ms(&self) -> u32 {
        self.default_timeout_secs.saturating_mul(1000)
    }
}

pub const MODES: [Mode; 4] = [
    Mode { name: "Stand by", pwm_hz: 0, blink_hz: 0, default_timeout_secs: 0 },
    Mode { name: "Low speed", pwm_hz: 55, blink_hz: 1, default_timeout_secs: 120 },
    Mode { name: "Mid speed", pwm_hz: 100, blink_hz: 2, default_timeout_secs: 60 },
    Mode { name: "Max speed", pwm_hz: 160, blink_hz: 4, default_timeout_secs: 30 },
];

/// Number of modes (also the number of mode rows in the powered menu).
pub const MODE_COUNT: usize = MODES.len();

/// Look up a mode; `None` for out-of-range ids.
pub fn mode(id: ModeId) -> Option<&'static Mode> {
    MODES.get(id as usize)
}

/// Human-readable mode name for log lines; `"?"` for unknown ids.
pub fn label(id: ModeId) -> &'static str {
    mode(id).map_or("?", |m| m.name)
}
