//! Serial-console renderer.
//!
//! Boards without a panel (and bring-up sessions) get each frame as one
//! JSON line on the log, which a host-side viewer can replay.

use log::{info, warn};

use crate::app::ports::RenderPort;
use crate::ui::ScreenView;

#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u32,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self { frames: 0 }
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl RenderPort for LogRenderer {
    fn render(&mut self, view: &ScreenView) {
        self.frames = self.frames.wrapping_add(1);
        match serde_json::to_string(view) {
            Ok(json) => info!("VIEW #{} | {}", self.frames, json),
            Err(e) => warn!("VIEW #{} | encode failed: {}", self.frames, e),
        }
    }
}
