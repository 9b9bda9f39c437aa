//! Output drivers, key sampling, timers, and hardware initialisation.

pub mod aux_power;
pub mod button;
pub mod hw_init;
pub mod hw_timer;
pub mod pwm_output;
pub mod status_led;
