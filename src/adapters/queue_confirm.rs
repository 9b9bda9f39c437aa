//! Two-button safety dialog driven by the input queue.
//!
//! Blocks the main loop until the user answers.  Timer callbacks keep
//! running meanwhile; their flags are picked up on the next loop
//! iteration.
//!
//! | Input           | Answer  |
//! |-----------------|---------|
//! | Right / Ok      | confirm |
//! | Left / Back     | cancel  |
//! | long Back       | cancel  |
//! | anything else   | ignored |

use core::time::Duration;

use log::info;

use crate::app::ports::{ConfirmPort, Prompt};
use crate::events::{InputEvent, InputQueue, Key, PressKind};

pub struct QueueConfirm<'q> {
    queue: &'q InputQueue,
    poll: Duration,
}

impl<'q> QueueConfirm<'q> {
    pub fn new(queue: &'q InputQueue, poll: Duration) -> Self {
        Self { queue, poll }
    }
}

/// Map one input to a dialog answer.
pub fn answer(ev: InputEvent) -> Option<bool> {
    match (ev.key, ev.kind) {
        (Key::Right | Key::Ok, PressKind::Short) => Some(true),
        (Key::Left, PressKind::Short) | (Key::Back, PressKind::Short | PressKind::Long) => {
            Some(false)
        }
        _ => None,
    }
}

impl ConfirmPort for QueueConfirm<'_> {
    fn confirm(&mut self, prompt: Prompt) -> bool {
        // Keys pressed before the dialog appeared must not answer it.
        self.queue.clear();
        info!(
            "DIALOG | {} | {} | [{}] [{}]",
            prompt.header(),
            prompt.body().replace('\n', " "),
            prompt.cancel_label(),
            prompt.confirm_label()
        );
        loop {
            let Some(ev) = self.queue.dequeue_timeout(self.poll) else {
                continue;
            };
            if let Some(ok) = answer(ev) {
                info!("DIALOG | {:?} -> {}", prompt, if ok { "confirmed" } else { "cancelled" });
                return ok;
            }
        }
    }
}
