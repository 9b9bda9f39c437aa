//! Software timers backing [`TimerPort`].
//!
//! On ESP-IDF each [`TimerId`] maps to one `esp_timer` dispatched on the
//! esp_timer task (not ISR).  The callback receives a boxed context naming
//! its timer and the countdown epoch captured at start, and forwards both to
//! [`TimerShared::on_fire`], which only touches atomics and the indicator
//! pin.
//!
//! On host, [`SimTimers`] keeps a virtual millisecond clock.  Nothing fires
//! until the test calls [`SimTimers::advance`], which makes countdown and
//! blink behaviour fully deterministic.

use std::sync::Arc;

use crate::app::ports::TimerPort;
use crate::timers::{TimerId, TimerShared};

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use crate::error::{Error, Result};

#[cfg(target_os = "espidf")]
struct TimerCtx {
    id: TimerId,
    /// Countdown epoch at the last start.
    epoch: AtomicU32,
    shared: Arc<TimerShared>,
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn timer_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: `arg` points at a TimerCtx boxed inside EspTimers, which
    // deletes every handle before the boxes are dropped.
    let ctx = unsafe { &*(arg as *const TimerCtx) };
    ctx.shared.on_fire(ctx.id, ctx.epoch.load(Ordering::Acquire));
}

#[cfg(target_os = "espidf")]
fn c_name(id: TimerId) -> &'static core::ffi::CStr {
    match id {
        TimerId::CountdownTick => c"countdown_tick",
        TimerId::CountdownExpiry => c"countdown_expiry",
        TimerId::IndicatorBlink => c"indicator_blink",
        TimerId::HintHide => c"hint_hide",
    }
}

/// The four application timers as `esp_timer` handles.  Owned by the main
/// task.
#[cfg(target_os = "espidf")]
pub struct EspTimers {
    handles: [esp_timer_handle_t; TimerId::COUNT],
    contexts: Vec<Box<TimerCtx>>,
}

#[cfg(target_os = "espidf")]
impl EspTimers {
    pub fn new(shared: Arc<TimerShared>) -> Result<Self> {
        let mut timers = Self {
            handles: [core::ptr::null_mut(); TimerId::COUNT],
            contexts: Vec::with_capacity(TimerId::COUNT),
        };
        for id in TimerId::ALL {
            let ctx = Box::new(TimerCtx {
                id,
                epoch: AtomicU32::new(0),
                shared: Arc::clone(&shared),
            });
            let args = esp_timer_create_args_t {
                callback: Some(timer_cb),
                arg: core::ptr::from_ref::<TimerCtx>(&*ctx).cast_mut().cast(),
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: c_name(id).as_ptr(),
                skip_unhandled_events: true,
            };
            timers.contexts.push(ctx);
            // SAFETY: args outlives the call; the context box is kept alive
            // by `timers` for as long as the handle exists.
            let ret = unsafe { esp_timer_create(&args, &mut timers.handles[id.index()]) };
            if ret != ESP_OK as i32 {
                log::error!("hw_timer: create {} failed (rc={})", id.name(), ret);
                return Err(Error::Timer(ret));
            }
        }
        log::info!("hw_timer: {} timers created", TimerId::COUNT);
        Ok(timers)
    }

    fn handle(&self, id: TimerId) -> esp_timer_handle_t {
        self.handles[id.index()]
    }

    /// Stop `id` and tag its next run with the current countdown epoch.
    fn prepare(&mut self, id: TimerId) {
        self.stop(id);
        let ctx = &self.contexts[id.index()];
        ctx.epoch.store(ctx.shared.countdown_epoch(), Ordering::Release);
    }
}

#[cfg(target_os = "espidf")]
impl TimerPort for EspTimers {
    fn start_periodic(&mut self, id: TimerId, period_ms: u32) {
        self.prepare(id);
        let us = u64::from(period_ms.max(1)) * 1_000;
        // SAFETY: handle created in new(); main task only.
        let ret = unsafe { esp_timer_start_periodic(self.handle(id), us) };
        if ret != ESP_OK as i32 {
            log::error!("hw_timer: start {} failed (rc={})", id.name(), ret);
        }
    }

    fn start_once(&mut self, id: TimerId, delay_ms: u32) {
        self.prepare(id);
        let us = u64::from(delay_ms.max(1)) * 1_000;
        // SAFETY: see start_periodic().
        let ret = unsafe { esp_timer_start_once(self.handle(id), us) };
        if ret != ESP_OK as i32 {
            log::error!("hw_timer: start {} failed (rc={})", id.name(), ret);
        }
    }

    fn stop(&mut self, id: TimerId) {
        // ESP_ERR_INVALID_STATE just means it was not running.
        // SAFETY: see start_periodic().
        unsafe {
            esp_timer_stop(self.handle(id));
        }
    }
}

#[cfg(target_os = "espidf")]
impl Drop for EspTimers {
    fn drop(&mut self) {
        for handle in self.handles {
            if handle.is_null() {
                continue;
            }
            // SAFETY: non-null handles came from esp_timer_create; deleted
            // exactly once here, before the contexts are freed.
            unsafe {
                esp_timer_stop(handle);
                esp_timer_delete(handle);
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host backend
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct SimSlot {
    deadline_ms: u64,
    /// `Some` for periodic timers.
    period_ms: Option<u32>,
    /// Countdown epoch at start.
    epoch: u32,
}

/// Virtual-clock timers for host tests and fuzzing.
pub struct SimTimers {
    shared: Arc<TimerShared>,
    now_ms: u64,
    slots: [Option<SimSlot>; TimerId::COUNT],
}

impl SimTimers {
    pub fn new(shared: Arc<TimerShared>) -> Self {
        Self { shared, now_ms: 0, slots: [None; TimerId::COUNT] }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Period of `id` if it is running as a periodic timer.
    pub fn period_ms(&self, id: TimerId) -> Option<u32> {
        self.slots[id.index()].and_then(|s| s.period_ms)
    }

    /// Absolute time of the next firing of `id`.
    pub fn deadline_ms(&self, id: TimerId) -> Option<u64> {
        self.slots[id.index()].map(|s| s.deadline_ms)
    }

    /// Move the clock forward by `ms`, firing every due timer in deadline
    /// order.  Timers due at the same instant fire in id order.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms.saturating_add(ms);
        while let Some(id) = self.next_due(target) {
            let idx = id.index();
            let Some(slot) = self.slots[idx] else { break };
            self.now_ms = slot.deadline_ms;
            self.slots[idx] = slot.period_ms.map(|p| SimSlot {
                deadline_ms: slot.deadline_ms + u64::from(p),
                ..slot
            });
            self.shared.on_fire(id, slot.epoch);
        }
        self.now_ms = target;
    }

    fn next_due(&self, target: u64) -> Option<TimerId> {
        TimerId::ALL
            .iter()
            .filter_map(|&id| self.slots[id.index()].map(|s| (s.deadline_ms, id.index(), id)))
            .filter(|&(deadline, _, _)| deadline <= target)
            .min_by_key(|&(deadline, idx, _)| (deadline, idx))
            .map(|(_, _, id)| id)
    }

    fn arm(&mut self, id: TimerId, delay_ms: u32, period_ms: Option<u32>) {
        self.slots[id.index()] = Some(SimSlot {
            deadline_ms: self.now_ms + u64::from(delay_ms.max(1)),
            period_ms,
            epoch: self.shared.countdown_epoch(),
        });
    }
}

impl TimerPort for SimTimers {
    fn start_periodic(&mut self, id: TimerId, period_ms: u32) {
        let period = period_ms.max(1);
        self.arm(id, period, Some(period));
    }

    fn start_once(&mut self, id: TimerId, delay_ms: u32) {
        self.arm(id, delay_ms, None);
    }

    fn stop(&mut self, id: TimerId) {
        self.slots[id.index()] = None;
    }
}
