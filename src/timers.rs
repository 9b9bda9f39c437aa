//! State shared between timer callbacks and the main loop.
//!
//! Timer callbacks run on the esp_timer task (or inside
//! [`SimTimers::advance`](crate::drivers::hw_timer::SimTimers::advance) on
//! host) and may only touch the atomics below plus the indicator output.
//! Everything else is owned by the main loop, which observes the flags
//! written here at its next iteration.
//!
//! ```text
//!   esp_timer task            main loop
//!   ──────────────            ─────────
//!   CountdownTick   ──▶ remaining_ms -= 1000 ──▶ redraw
//!   CountdownExpiry ──▶ expired_epoch = e    ──▶ enter_powered_idle()
//!   IndicatorBlink  ──▶ toggle LED
//!   HintHide        ──▶ hint_visible = 0     ──▶ redraw
//! ```
//!
//! Every armed countdown gets a fresh non-zero epoch.  Timer drivers capture
//! the epoch when a countdown timer is started and hand it back on each
//! firing, so a callback that was already dispatched when its countdown was
//! cancelled cannot act on the next one.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::app::ports::IndicatorPort;
use crate::control::countdown::TICK_PERIOD_MS;

/// The four software timers of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum TimerId {
    /// 1 s periodic countdown decrement.
    CountdownTick = 0,
    /// One-shot end of the runtime budget.
    CountdownExpiry = 1,
    /// Periodic indicator toggle.
    IndicatorBlink = 2,
    /// One-shot exit-hint dismissal.
    HintHide = 3,
}

impl TimerId {
    /// Total number of timers.
    pub const COUNT: usize = 4;

    /// All timers, in id order.
    pub const ALL: [TimerId; Self::COUNT] = [
        TimerId::CountdownTick,
        TimerId::CountdownExpiry,
        TimerId::IndicatorBlink,
        TimerId::HintHide,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::CountdownTick => "countdown_tick",
            Self::CountdownExpiry => "countdown_expiry",
            Self::IndicatorBlink => "indicator_blink",
            Self::HintHide => "hint_hide",
        }
    }
}

/// Callback-visible state.  Held behind an `Arc` by the main loop, the
/// timer driver and the mode controller.
pub struct TimerShared {
    remaining_ms: AtomicU32,
    /// Epoch of the running countdown; 0 when none.
    countdown_epoch: AtomicU32,
    /// Epoch whose expiry fired and has not been consumed; 0 when none.
    expired_epoch: AtomicU32,
    /// Last epoch handed out.  Written by the main loop only.
    epoch_seq: AtomicU32,
    indicator_on: AtomicBool,
    hint_visible: AtomicBool,
    redraw: AtomicBool,
    indicator: Arc<dyn IndicatorPort>,
}

impl TimerShared {
    pub fn new(indicator: Arc<dyn IndicatorPort>) -> Self {
        Self {
            remaining_ms: AtomicU32::new(0),
            countdown_epoch: AtomicU32::new(0),
            expired_epoch: AtomicU32::new(0),
            epoch_seq: AtomicU32::new(0),
            indicator_on: AtomicBool::new(false),
            hint_visible: AtomicBool::new(false),
            redraw: AtomicBool::new(false),
            indicator,
        }
    }

    // ── Callback side ─────────────────────────────────────────

    /// Timer `id` fired.  `epoch` is the countdown epoch captured when the
    /// timer was started; only the countdown timers look at it.  Never
    /// blocks.
    pub fn on_fire(&self, id: TimerId, epoch: u32) {
        match id {
            TimerId::CountdownTick => {
                if epoch == 0 || self.countdown_epoch.load(Ordering::Acquire) != epoch {
                    return;
                }
                // The closure always returns `Some`, so this cannot fail;
                // at 0 it simply stays at 0.
                let _ = self
                    .remaining_ms
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |ms| {
                        Some(ms.saturating_sub(TICK_PERIOD_MS))
                    });
                self.request_redraw();
            }
            TimerId::CountdownExpiry => {
                // Only the expiry of the countdown that is still running
                // counts, and only once.
                let current = epoch != 0
                    && self
                        .countdown_epoch
                        .compare_exchange(epoch, 0, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok();
                if current {
                    self.remaining_ms.store(0, Ordering::Release);
                    self.expired_epoch.store(epoch, Ordering::Release);
                    self.request_redraw();
                }
            }
            TimerId::IndicatorBlink => {
                let on = !self.indicator_on.load(Ordering::Acquire);
                self.set_indicator(on);
            }
            TimerId::HintHide => {
                self.hint_visible.store(false, Ordering::Release);
                self.request_redraw();
            }
        }
    }

    // ── Main-loop side ────────────────────────────────────────

    /// Start a countdown of `ms` and return its epoch.  Called before the
    /// countdown timers are started.
    pub(crate) fn begin_countdown(&self, ms: u32) -> u32 {
        let epoch = self.epoch_seq.load(Ordering::Acquire).wrapping_add(1).max(1);
        self.epoch_seq.store(epoch, Ordering::Release);
        self.expired_epoch.store(0, Ordering::Release);
        self.remaining_ms.store(ms, Ordering::Release);
        self.countdown_epoch.store(epoch, Ordering::Release);
        epoch
    }

    /// Forget any countdown, including an unconsumed expiry.
    pub(crate) fn end_countdown(&self) {
        self.countdown_epoch.store(0, Ordering::Release);
        self.remaining_ms.store(0, Ordering::Release);
        self.expired_epoch.store(0, Ordering::Release);
    }

    /// Epoch of the running countdown, 0 when none.  Timer drivers tag
    /// each start with it.
    pub fn countdown_epoch(&self) -> u32 {
        self.countdown_epoch.load(Ordering::Acquire)
    }

    /// Milliseconds left on the countdown; 0 when idle.
    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms.load(Ordering::Acquire)
    }

    /// Peek at the expiry flag without consuming it.
    pub fn timeout_expired(&self) -> bool {
        self.expired_epoch.load(Ordering::Acquire) != 0
    }

    /// Consume the expiry flag, returning the epoch of the countdown that
    /// expired.
    pub fn take_expiry(&self) -> Option<u32> {
        match self.expired_epoch.swap(0, Ordering::AcqRel) {
            0 => None,
            epoch => Some(epoch),
        }
    }

    pub fn countdown_armed(&self) -> bool {
        self.countdown_epoch() != 0
    }

    /// Drive the indicator and remember its level.
    pub fn set_indicator(&self, on: bool) {
        self.indicator_on.store(on, Ordering::Release);
        self.indicator.set_indicator(on);
    }

    pub fn indicator_on(&self) -> bool {
        self.indicator_on.load(Ordering::Acquire)
    }

    pub fn show_hint(&self) {
        self.hint_visible.store(true, Ordering::Release);
        self.request_redraw();
    }

    pub fn hide_hint(&self) {
        self.hint_visible.store(false, Ordering::Release);
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible.load(Ordering::Acquire)
    }

    pub fn request_redraw(&self) {
        self.redraw.store(true, Ordering::Release);
    }

    /// Consume the redraw request.
    pub fn take_redraw(&self) -> bool {
        self.redraw.swap(false, Ordering::AcqRel)
    }
}
