//! Runtime countdown.
//!
//! While the output is powered, the runtime limit is enabled and a non-idle
//! mode with a non-zero budget is active, a countdown runs: a 1 s periodic
//! tick decrements the remaining time for display and a one-shot timer
//! fires at the end of the budget.  The expiry only raises a flag; the main
//! loop performs the fallback to idle.
//!
//! Every arm starts from a clean slate: both timers are stopped and the
//! shared state is cleared before the gate is evaluated.  Each arm gets a
//! new epoch, and only an expiry carrying the current epoch is honoured.

use log::{debug, info};

use crate::app::ports::TimerPort;
use crate::control::modes::{self, IDLE_MODE, ModeId};
use crate::timers::{TimerId, TimerShared};

/// Display decrement period.
pub const TICK_PERIOD_MS: u32 = 1000;

/// Budget for `mode` given the current power and limit settings, or `None`
/// when no countdown should run.
pub fn countdown_duration_ms(powered: bool, limit_runtime: bool, mode: ModeId) -> Option<u32> {
    if !powered || !limit_runtime || mode == IDLE_MODE {
        return None;
    }
    let ms = modes::mode(mode)?.timeout_ms();
    (ms != 0).then_some(ms)
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    ms: u32,
    epoch: u32,
}

/// Owner-side view of the countdown timers.
#[derive(Debug, Default)]
pub struct Countdown {
    armed: Option<Armed>,
}

impl Countdown {
    pub const fn new() -> Self {
        Self { armed: None }
    }

    /// Cancel any running countdown, then start one of `duration_ms` if
    /// given.  Returns `true` if a countdown is now running.
    pub fn arm(
        &mut self,
        duration_ms: Option<u32>,
        timers: &mut impl TimerPort,
        shared: &TimerShared,
    ) -> bool {
        self.cancel(timers, shared);
        let Some(ms) = duration_ms else {
            return false;
        };

        let epoch = shared.begin_countdown(ms);
        timers.start_periodic(TimerId::CountdownTick, TICK_PERIOD_MS);
        timers.start_once(TimerId::CountdownExpiry, ms);
        self.armed = Some(Armed { ms, epoch });
        info!("countdown: armed for {} ms (epoch {})", ms, epoch);
        true
    }

    /// Stop both timers and clear remaining time and any pending expiry.
    pub fn cancel(&mut self, timers: &mut impl TimerPort, shared: &TimerShared) {
        // Disarm first so an expiry already in flight is discarded.
        shared.end_countdown();
        timers.stop(TimerId::CountdownTick);
        timers.stop(TimerId::CountdownExpiry);
        if self.armed.take().is_some() {
            debug!("countdown: cancelled");
        }
    }

    /// Budget of the most recent arm, if it has not been cancelled.
    pub fn armed_ms(&self) -> Option<u32> {
        self.armed.map(|a| a.ms)
    }

    /// Whether an expiry tagged `epoch` belongs to the countdown armed now.
    pub fn is_current(&self, epoch: u32) -> bool {
        self.armed.is_some_and(|a| a.epoch == epoch)
    }
}
