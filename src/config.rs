//! Controller configuration parameters
//!
//! All tunable parameters for the starter UI and output stage. These are
//! compile-time defaults: user-facing settings (runtime limit, inverter
//! profile) live in the FSM context and are not persisted across restarts.

use serde::{Deserialize, Serialize};

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Output stage ---
    /// PWM duty cycle used for every speed mode (0-100%)
    pub pwm_duty_percent: u8,
    /// Settle delay after stopping the PWM unit (milliseconds)
    pub stop_settle_ms: u32,

    // --- UI layout ---
    /// Rows visible at once in Menu / Settings / SelectInverter lists
    pub visible_rows: u8,
    /// Display height in pixels
    pub screen_height_px: u8,
    /// Top margin of the help text area in pixels
    pub help_top_margin_px: u8,
    /// Help text line height in pixels
    pub help_line_height_px: u8,
    /// How long the "long press back to exit" hint stays visible (milliseconds)
    pub hint_duration_ms: u32,

    // --- Input ---
    /// Main loop dequeue timeout (milliseconds)
    pub input_poll_timeout_ms: u32,
    /// Key sampling interval of the button task (milliseconds)
    pub key_sample_interval_ms: u32,
    /// Minimum stable press before a key counts as pressed (milliseconds)
    pub debounce_ms: u32,
    /// Hold time that turns a press into a long press (milliseconds)
    pub long_press_ms: u32,
    /// Auto-repeat interval while a key stays held after a long press (milliseconds)
    pub repeat_interval_ms: u32,

    // --- Policy defaults at boot ---
    /// Runtime limit enabled at boot
    pub limit_runtime_default: bool,
    /// Arrow captcha enabled at boot
    pub arrow_captcha_default: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Output stage
            pwm_duty_percent: 50,
            stop_settle_ms: 1,

            // UI layout (128x64 panel)
            visible_rows: 4,
            screen_height_px: 64,
            help_top_margin_px: 10,
            help_line_height_px: 9,
            hint_duration_ms: 1500,

            // Input
            input_poll_timeout_ms: 100,
            key_sample_interval_ms: 10,
            debounce_ms: 20,
            long_press_ms: 500,
            repeat_interval_ms: 150,

            // Policy
            limit_runtime_default: true,
            arrow_captcha_default: true,
        }
    }
}
