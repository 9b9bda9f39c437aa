//! Output control: speed mode table, runtime countdown, indicator blink
//! and the controller that sequences them against the output stage.

pub mod controller;
pub mod countdown;
pub mod indicator;
pub mod modes;
