//! Fuzz target: `AppService::step`
//!
//! Decodes arbitrary bytes into a stream of key presses, dialog answers
//! and clock advances, drives the full service against in-memory
//! adapters, and asserts that the signal pin only ever carries a square
//! wave while a profile is powered.
//!
//! cargo fuzz run fuzz_input_sequence

#![no_main]

use std::sync::Arc;

use ics_starter::app::events::AppEvent;
use ics_starter::app::ports::{
    ActuatorPort, ConfirmPort, EventSink, IndicatorPort, Prompt, RenderPort, TimerPort,
};
use ics_starter::app::service::{AppService, Flow};
use ics_starter::config::ControllerConfig;
use ics_starter::drivers::hw_timer::SimTimers;
use ics_starter::events::{InputEvent, Key, PressKind};
use ics_starter::timers::{TimerId, TimerShared};
use ics_starter::ui::ScreenView;
use libfuzzer_sys::fuzz_target;

struct NullIndicator;

impl IndicatorPort for NullIndicator {
    fn set_indicator(&self, _on: bool) {}
}

struct Hw {
    signal: bool,
    timers: SimTimers,
}

impl ActuatorPort for Hw {
    fn disconnect_output(&mut self) {
        assert!(!self.signal, "pin reconfigured under a running signal");
    }
    fn force_output_safe_level(&mut self) {
        assert!(!self.signal, "pin reconfigured under a running signal");
    }
    fn start_signal(&mut self, _freq_hz: u32) {
        self.signal = true;
    }
    fn stop_signal(&mut self) {
        self.signal = false;
    }
    fn set_aux_power(&mut self, _on: bool) {}
}

impl TimerPort for Hw {
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

struct ByteConfirm(bool);

impl ConfirmPort for ByteConfirm {
    fn confirm(&mut self, _prompt: Prompt) -> bool {
        self.0
    }
}

struct Sink;

impl EventSink for Sink {
    fn emit(&mut self, _event: &AppEvent) {}
}

struct Render;

impl RenderPort for Render {
    fn render(&mut self, view: &ScreenView) {
        assert!(view.rows.len() <= ics_starter::ui::MAX_VISIBLE_ROWS);
    }
}

fuzz_target!(|data: &[u8]| {
    let shared = Arc::new(TimerShared::new(Arc::new(NullIndicator)));
    let mut hw = Hw { signal: false, timers: SimTimers::new(Arc::clone(&shared)) };
    let mut app = AppService::new(ControllerConfig::default(), Arc::clone(&shared));
    let mut confirm = ByteConfirm(false);
    let (mut sink, mut render) = (Sink, Render);
    app.start(&mut hw, &mut sink);

    for &byte in data {
        // Low 3 bits pick the key (6 and 7 advance the clock), next 2 bits
        // the press kind, top bit answers any dialog.
        confirm.0 = byte & 0x80 != 0;
        let input = match byte & 0x07 {
            k @ 0..=5 => {
                let kind = match (byte >> 3) & 0x03 {
                    0 | 1 => PressKind::Short,
                    2 => PressKind::Repeat,
                    _ => PressKind::Long,
                };
                Some(InputEvent::new(Key::ALL[usize::from(k)], kind))
            }
            _ => {
                hw.timers.advance(u64::from(byte >> 3) * 1_000);
                None
            }
        };
        if app.step(input, &mut hw, &mut confirm, &mut render, &mut sink) == Flow::Exit {
            break;
        }
        let s = app.snapshot();
        assert!(!hw.signal || (s.powered && s.active_mode != 0));
    }

    app.shutdown(&mut hw, &mut sink);
    assert!(!hw.signal);
});
