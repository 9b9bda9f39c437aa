//! Polled key-pad driver with short, long, and repeat press detection.
//!
//! ## Hardware
//!
//! Six active-low momentary switches with internal pull-ups.  A sampling
//! task reads every key at a fixed interval and feeds the level into one
//! [`ButtonDriver`] per key, which runs the debounce + gesture state
//! machine and yields at most one [`InputEvent`] per sample.
//!
//! ## Gesture detection
//!
//! | Gesture | Condition                                  | Event    |
//! |---------|--------------------------------------------|----------|
//! | Short   | Released before the long-press threshold   | `Short`  |
//! | Long    | Held for `long_press_ms`                   | `Long`   |
//! | Repeat  | Still held, every `repeat_interval_ms`     | `Repeat` |
//!
//! A long press suppresses the short press on release.

use crate::config::ControllerConfig;
use crate::events::{InputEvent, Key, PressKind};

/// Gesture thresholds in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTiming {
    pub debounce_ms: u32,
    pub long_press_ms: u32,
    pub repeat_interval_ms: u32,
}

impl ButtonTiming {
    pub fn from_config(cfg: &ControllerConfig) -> Self {
        Self {
            debounce_ms: cfg.debounce_ms,
            long_press_ms: cfg.long_press_ms,
            repeat_interval_ms: cfg.repeat_interval_ms.max(1),
        }
    }
}

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Debounce { since_ms: u32 },
    Pressed { since_ms: u32 },
    Held { last_ms: u32 },
}

pub struct ButtonDriver {
    key: Key,
    timing: ButtonTiming,
    state: GestureState,
}

impl ButtonDriver {
    pub fn new(key: Key, timing: ButtonTiming) -> Self {
        Self {
            key,
            timing,
            state: GestureState::Idle,
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Feed one sample.  `now_ms` is monotonic and may wrap.
    pub fn sample(&mut self, now_ms: u32, pressed: bool) -> Option<InputEvent> {
        match self.state {
            GestureState::Idle => {
                if pressed {
                    self.state = GestureState::Debounce { since_ms: now_ms };
                }
                None
            }

            GestureState::Debounce { since_ms } => {
                if !pressed {
                    self.state = GestureState::Idle;
                } else if now_ms.wrapping_sub(since_ms) >= self.timing.debounce_ms {
                    self.state = GestureState::Pressed { since_ms };
                }
                None
            }

            GestureState::Pressed { since_ms } => {
                if !pressed {
                    self.state = GestureState::Idle;
                    return Some(self.event(PressKind::Short));
                }
                if now_ms.wrapping_sub(since_ms) >= self.timing.long_press_ms {
                    self.state = GestureState::Held { last_ms: now_ms };
                    return Some(self.event(PressKind::Long));
                }
                None
            }

            GestureState::Held { last_ms } => {
                if !pressed {
                    self.state = GestureState::Idle;
                    return None;
                }
                if now_ms.wrapping_sub(last_ms) >= self.timing.repeat_interval_ms {
                    self.state = GestureState::Held { last_ms: now_ms };
                    return Some(self.event(PressKind::Repeat));
                }
                None
            }
        }
    }

    fn event(&self, kind: PressKind) -> InputEvent {
        InputEvent::new(self.key, kind)
    }
}

/// All six keys, sampled together.
pub struct Keypad {
    buttons: [ButtonDriver; Key::COUNT],
}

impl Keypad {
    pub fn new(timing: ButtonTiming) -> Self {
        Self {
            buttons: Key::ALL.map(|key| ButtonDriver::new(key, timing)),
        }
    }

    /// Sample every key through `read` (true = pressed) and pass each
    /// recognised gesture to `emit`, in pad scan order.
    pub fn poll(&mut self, now_ms: u32, read: impl Fn(Key) -> bool, mut emit: impl FnMut(InputEvent)) {
        for button in &mut self.buttons {
            if let Some(ev) = button.sample(now_ms, read(button.key())) {
                emit(ev);
            }
        }
    }

    /// Level of `key` on the pad GPIOs.
    #[cfg(target_os = "espidf")]
    pub fn is_pressed_hw(key: Key) -> bool {
        !crate::drivers::hw_init::gpio_read(crate::pins::KEY_GPIOS[key as usize])
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn is_pressed_hw(_key: Key) -> bool {
        false
    }
}
