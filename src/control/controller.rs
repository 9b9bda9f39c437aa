//! Mode controller: sequences the output stage, aux rail, indicator and
//! countdown.
//!
//! Every transition follows one fixed order so that the signal pin is never
//! reconfigured while a square wave is still running:
//!
//! ```text
//!   apply_mode(0)    stop_signal → safe level → cancel countdown → indicator off
//!   apply_mode(n)    stop_signal → start_signal(hz) → arm countdown → blink(rate)
//!   enter_safe       stop_signal → disconnect → aux off → indicator off → cancel
//!   powered_idle     aux on (Samsung) → apply_mode(0)
//! ```

use std::sync::Arc;

use log::{info, warn};

use crate::app::ports::{ActuatorPort, TimerPort};
use crate::control::countdown::{Countdown, countdown_duration_ms};
use crate::control::indicator::IndicatorBlink;
use crate::control::modes::{self, IDLE_MODE, ModeId};
use crate::fsm::context::FsmContext;
use crate::fsm::cursor::ListCursor;
use crate::timers::{TimerId, TimerShared};

pub struct ModeController {
    shared: Arc<TimerShared>,
    countdown: Countdown,
    blink: IndicatorBlink,
}

impl ModeController {
    pub fn new(shared: Arc<TimerShared>) -> Self {
        Self {
            shared,
            countdown: Countdown::new(),
            blink: IndicatorBlink::new(),
        }
    }

    /// Drive the output stage into `id`.  Unknown ids are ignored and
    /// return `false`.
    pub fn apply_mode(
        &mut self,
        ctx: &mut FsmContext,
        id: ModeId,
        hw: &mut (impl ActuatorPort + TimerPort),
    ) -> bool {
        let Some(mode) = modes::mode(id) else {
            warn!("controller: ignoring unknown mode {}", id);
            return false;
        };
        ctx.active_mode = id;

        hw.stop_signal();
        if mode.is_idle() {
            hw.force_output_safe_level();
            self.countdown.cancel(hw, &self.shared);
        } else {
            hw.start_signal(mode.pwm_hz);
            self.countdown.arm(
                countdown_duration_ms(ctx.powered, ctx.limit_runtime, id),
                hw,
                &self.shared,
            );
        }
        self.blink.apply(mode.blink_hz, hw, &self.shared);

        info!("controller: mode {} ({} Hz)", mode.name, mode.pwm_hz);
        true
    }

    /// Park every output: no signal, pin disconnected, rail off, indicator
    /// off, no countdown.  The cursor returns to the top.
    pub fn enter_safe(&mut self, ctx: &mut FsmContext, hw: &mut (impl ActuatorPort + TimerPort)) {
        ctx.powered = false;
        ctx.cursor = ListCursor::default();

        hw.stop_signal();
        hw.disconnect_output();
        hw.set_aux_power(false);
        self.blink.stop(hw, &self.shared);
        self.countdown.cancel(hw, &self.shared);
        info!("controller: safe state");
    }

    /// Power the selected profile and idle in mode 0.
    pub fn enter_powered_idle(
        &mut self,
        ctx: &mut FsmContext,
        hw: &mut (impl ActuatorPort + TimerPort),
    ) {
        ctx.powered = true;
        ctx.cursor = ListCursor::default();

        hw.enable_profile_power(ctx.profile);
        self.apply_mode(ctx, IDLE_MODE, hw);
        info!("controller: {} powered, idle", ctx.profile.name());
    }

    /// Re-evaluate the countdown gate for the current mode.  Any running
    /// countdown restarts from the full budget.
    pub fn rearm_countdown(&mut self, ctx: &FsmContext, hw: &mut impl TimerPort) -> bool {
        self.countdown.arm(
            countdown_duration_ms(ctx.powered, ctx.limit_runtime, ctx.active_mode),
            hw,
            &self.shared,
        )
    }

    pub fn cancel_countdown(&mut self, hw: &mut impl TimerPort) {
        self.countdown.cancel(hw, &self.shared);
    }

    /// Release every output and timer on exit.
    pub fn shutdown(&mut self, hw: &mut (impl ActuatorPort + TimerPort)) {
        self.blink.stop(hw, &self.shared);
        hw.stop(TimerId::HintHide);
        self.shared.hide_hint();
        self.countdown.cancel(hw, &self.shared);

        hw.stop_signal();
        hw.disconnect_output();
        hw.set_aux_power(false);
        self.shared.set_indicator(false);
        info!("controller: outputs released");
    }

    /// Budget of the running countdown, if any.
    pub fn countdown_ms(&self) -> Option<u32> {
        self.countdown.armed_ms()
    }

    /// Whether an expiry tagged `epoch` belongs to the running countdown.
    pub fn owns_expiry(&self, epoch: u32) -> bool {
        self.countdown.is_current(epoch)
    }

    pub fn blink_rate_hz(&self) -> u8 {
        self.blink.rate_hz()
    }
}
