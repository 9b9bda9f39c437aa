//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the signal output, the aux rail and the timer backend, exposing
//! them through [`ActuatorPort`] and [`TimerPort`].  This is the only
//! module in the system that drives the output stage.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, TimerPort};
use crate::drivers::aux_power::AuxPower;
use crate::drivers::pwm_output::{OutputState, PwmOutput};
use crate::timers::TimerId;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P: OutputPin, T: TimerPort> {
    output: PwmOutput,
    aux: AuxPower<P>,
    timers: T,
}

impl<P: OutputPin, T: TimerPort> HardwareAdapter<P, T> {
    pub fn new(output: PwmOutput, aux: AuxPower<P>, timers: T) -> Self {
        Self { output, aux, timers }
    }

    pub fn output_state(&self) -> OutputState {
        self.output.state()
    }

    pub fn aux_enabled(&self) -> bool {
        self.aux.is_enabled()
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin, T: TimerPort> ActuatorPort for HardwareAdapter<P, T> {
    fn disconnect_output(&mut self) {
        self.output.disconnect();
    }

    fn force_output_safe_level(&mut self) {
        self.output.force_low();
    }

    fn start_signal(&mut self, freq_hz: u32) {
        self.output.start(freq_hz);
    }

    fn stop_signal(&mut self) {
        self.output.stop();
    }

    fn set_aux_power(&mut self, on: bool) {
        self.aux.set(on);
    }
}

// ── TimerPort implementation ──────────────────────────────────

impl<P: OutputPin, T: TimerPort> TimerPort for HardwareAdapter<P, T> {
    fn start_periodic(&mut self, id: TimerId, period_ms: u32) {
        self.timers.start_periodic(id, period_ms);
    }

    fn start_once(&mut self, id: TimerId, delay_ms: u32) {
        self.timers.start_once(id, delay_ms);
    }

    fn stop(&mut self, id: TimerId) {
        self.timers.stop(id);
    }
}
