//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements         | Connects to                |
//! |-----------------|--------------------|----------------------------|
//! | `hardware`      | ActuatorPort       | LEDC square wave, GPIO     |
//! |                 | TimerPort          | esp_timer / virtual clock  |
//! | `log_sink`      | EventSink          | Serial log output          |
//! | `log_render`    | RenderPort         | Serial log (JSON frames)   |
//! | `queue_confirm` | ConfirmPort        | Input queue                |
//!
//! The indicator side of the hardware is `drivers::status_led`, handed to
//! the timer callbacks directly.

pub mod hardware;
pub mod log_render;
pub mod log_sink;
pub mod queue_confirm;
