//! Input events and the bounded dispatch queue.
//!
//! Events are produced by the key sampling task (one [`InputEvent`] per
//! recognised gesture) and consumed by the main loop, which processes them
//! one at a time in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Key sampler │────▶│  InputQueue  │────▶│  Main Loop   │
//! │ (producer)  │     │  (depth 8)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The producer never blocks: when the queue is full the event is dropped.
//! The consumer blocks for at most the configured poll timeout so that
//! timer-driven flags are observed even without input.

use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use futures_lite::future;
use log::debug;
use serde::Serialize;

/// Maximum number of pending input events.
pub const INPUT_QUEUE_DEPTH: usize = 8;

/// Physical keys of the six-key pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Key {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Ok = 4,
    Back = 5,
}

impl Key {
    /// Number of keys on the pad.
    pub const COUNT: usize = 6;

    /// All keys, in pad scan order.
    pub const ALL: [Key; Self::COUNT] =
        [Key::Up, Key::Down, Key::Left, Key::Right, Key::Ok, Key::Back];
}

/// How a key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PressKind {
    /// Pressed and released before the long-press threshold.
    Short,
    /// Held past the long-press threshold.
    Long,
    /// Auto-repeat while still held after a long press.
    Repeat,
}

/// A single user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct InputEvent {
    pub key: Key,
    pub kind: PressKind,
}

impl InputEvent {
    pub const fn new(key: Key, kind: PressKind) -> Self {
        Self { key, kind }
    }

    pub const fn short(key: Key) -> Self {
        Self::new(key, PressKind::Short)
    }

    pub const fn long(key: Key) -> Self {
        Self::new(key, PressKind::Long)
    }

    pub const fn repeat(key: Key) -> Self {
        Self::new(key, PressKind::Repeat)
    }

    /// Long press of Back: leave the application from any screen.
    pub fn is_exit(&self) -> bool {
        self.key == Key::Back && self.kind == PressKind::Long
    }

    /// Short press or auto-repeat (list navigation on scrollable screens).
    pub fn is_short_or_repeat(&self) -> bool {
        matches!(self.kind, PressKind::Short | PressKind::Repeat)
    }
}

// ── Bounded MPSC queue ────────────────────────────────────────
//
// Producer: key sampler thread (never blocks).
// Consumer: main loop (blocks with timeout).

/// FIFO of pending input events with a fixed depth of [`INPUT_QUEUE_DEPTH`].
pub struct InputQueue {
    channel: Channel<CriticalSectionRawMutex, InputEvent, INPUT_QUEUE_DEPTH>,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InputQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue without blocking.
    /// Returns `false` if the queue is full (event dropped).
    pub fn try_enqueue(&self, event: InputEvent) -> bool {
        if self.channel.try_send(event).is_ok() {
            true
        } else {
            debug!("input: queue full, dropped {:?}", event);
            false
        }
    }

    /// Pop the oldest event, if any.
    pub fn try_dequeue(&self) -> Option<InputEvent> {
        self.channel.try_receive().ok()
    }

    /// Pop the oldest event, waiting at most `timeout` for one to arrive.
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<InputEvent> {
        if let Some(event) = self.try_dequeue() {
            return Some(event);
        }
        if timeout.is_zero() {
            return None;
        }
        future::block_on(future::or(
            async { Some(self.channel.receive().await) },
            async {
                async_io_mini::Timer::after(timeout).await;
                None
            },
        ))
    }

    /// Discard every pending event.
    pub fn clear(&self) {
        self.channel.clear();
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
