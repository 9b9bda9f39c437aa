//! GPIO / peripheral pin assignments for the ICS starter board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.
//! The aux-rail and indicator pins are also claimed as typed
//! `PinDriver`s in `main`; keep both in sync.

// ---------------------------------------------------------------------------
// Inverter speed signal
// ---------------------------------------------------------------------------

/// Square-wave output to the inverter "+" terminal.  Hi-Z when disconnected.
pub const SIGNAL_GPIO: i32 = 4;

/// LEDC channel / timer driving [`SIGNAL_GPIO`].
pub const SIGNAL_LEDC_CHANNEL: u32 = 0;
pub const SIGNAL_LEDC_TIMER: u32 = 0;

/// LEDC duty resolution (bits).  14 bits keeps the clock divider in range
/// down to the lowest speed frequency.
pub const PWM_RESOLUTION_BITS: u32 = 14;

// ---------------------------------------------------------------------------
// Auxiliary 5 V rail (load switch enable, active HIGH)
// ---------------------------------------------------------------------------

pub const AUX_5V_EN_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Status indicator (single LED, active HIGH)
// ---------------------------------------------------------------------------

pub const INDICATOR_LED_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Six-key pad (active-low with internal pull-ups)
// ---------------------------------------------------------------------------

pub const KEY_UP_GPIO: i32 = 10;
pub const KEY_DOWN_GPIO: i32 = 11;
pub const KEY_LEFT_GPIO: i32 = 12;
pub const KEY_RIGHT_GPIO: i32 = 13;
pub const KEY_OK_GPIO: i32 = 14;
pub const KEY_BACK_GPIO: i32 = 15;

/// Key pins in [`Key::ALL`](crate::events::Key::ALL) order.
pub const KEY_GPIOS: [i32; 6] = [
    KEY_UP_GPIO,
    KEY_DOWN_GPIO,
    KEY_LEFT_GPIO,
    KEY_RIGHT_GPIO,
    KEY_OK_GPIO,
    KEY_BACK_GPIO,
];
