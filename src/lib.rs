//! ICS Starter firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod fsm;
pub mod timers;
pub mod ui;

// Hardware-facing modules; host builds get in-memory stand-ins from the
// cfg-gated halves inside each file.
pub mod adapters;
pub mod drivers;
pub mod pins;
