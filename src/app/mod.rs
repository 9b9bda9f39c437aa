//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules of the starter: screen dispatch, the
//! confirm-before-energise policy, mode application and countdown expiry.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
