//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/LEDC registers.  Timers run on the
//! library's virtual clock so countdowns and blinking are deterministic.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use ics_starter::app::events::AppEvent;
use ics_starter::app::ports::{
    ActuatorPort, ConfirmPort, EventSink, IndicatorPort, Prompt, RenderPort, TimerPort,
};
use ics_starter::app::service::{AppService, Flow};
use ics_starter::config::ControllerConfig;
use ics_starter::drivers::hw_timer::SimTimers;
use ics_starter::drivers::pwm_output::OutputState;
use ics_starter::events::{InputEvent, Key};
use ics_starter::fsm::context::InverterProfile;
use ics_starter::timers::{TimerId, TimerShared};
use ics_starter::ui::ScreenView;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Disconnect,
    SafeLevel,
    StartSignal(u32),
    StopSignal,
    AuxPower(bool),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub timers: SimTimers,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(shared: Arc<TimerShared>) -> Self {
        Self {
            calls: Vec::new(),
            timers: SimTimers::new(shared),
        }
    }

    /// Pin state implied by the call history.
    pub fn output(&self) -> OutputState {
        self.calls.iter().fold(OutputState::Disconnected, |state, call| match call {
            ActuatorCall::Disconnect => OutputState::Disconnected,
            ActuatorCall::SafeLevel => OutputState::SafeLow,
            ActuatorCall::StartSignal(freq_hz) => OutputState::Signal { freq_hz: *freq_hz },
            ActuatorCall::StopSignal => match state {
                OutputState::Signal { .. } => OutputState::SafeLow,
                other => other,
            },
            ActuatorCall::AuxPower(_) => state,
        })
    }

    pub fn aux_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::AuxPower(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl ActuatorPort for MockHardware {
    fn disconnect_output(&mut self) {
        self.calls.push(ActuatorCall::Disconnect);
    }

    fn force_output_safe_level(&mut self) {
        self.calls.push(ActuatorCall::SafeLevel);
    }

    fn start_signal(&mut self, freq_hz: u32) {
        self.calls.push(ActuatorCall::StartSignal(freq_hz));
    }

    fn stop_signal(&mut self) {
        self.calls.push(ActuatorCall::StopSignal);
    }

    fn set_aux_power(&mut self, on: bool) {
        self.calls.push(ActuatorCall::AuxPower(on));
    }
}

impl TimerPort for MockHardware {
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

// ── Indicator ─────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingIndicator {
    on: AtomicBool,
    writes: AtomicU32,
}

#[allow(dead_code)]
impl RecordingIndicator {
    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl IndicatorPort for RecordingIndicator {
    fn set_indicator(&self, on: bool) {
        self.on.store(on, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Dialog ────────────────────────────────────────────────────

/// Answers prompts from a script; declines once the script runs out.
#[derive(Default)]
pub struct ScriptedConfirm {
    pub answers: VecDeque<bool>,
    pub prompts: Vec<Prompt>,
    /// When set, the running countdown expires while the next dialog is
    /// open, as the esp_timer task would do behind a blocked main loop.
    pub expire_while_open: Option<Arc<TimerShared>>,
}

impl ConfirmPort for ScriptedConfirm {
    fn confirm(&mut self, prompt: Prompt) -> bool {
        self.prompts.push(prompt);
        if let Some(shared) = self.expire_while_open.take() {
            shared.on_fire(TimerId::CountdownExpiry, shared.countdown_epoch());
        }
        self.answers.pop_front().unwrap_or(false)
    }
}

// ── Render / event recorders ──────────────────────────────────

#[derive(Default)]
pub struct RenderRecorder {
    pub frames: Vec<ScreenView>,
}

impl RenderPort for RenderRecorder {
    fn render(&mut self, view: &ScreenView) {
        self.frames.push(view.clone());
    }
}

#[derive(Default)]
pub struct EventRecorder {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventRecorder {
    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventRecorder {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig: a started AppService with every mock wired in ────────

pub struct Rig {
    pub app: AppService,
    pub hw: MockHardware,
    pub confirm: ScriptedConfirm,
    pub render: RenderRecorder,
    pub sink: EventRecorder,
    pub shared: Arc<TimerShared>,
    pub indicator: Arc<RecordingIndicator>,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        let indicator = Arc::new(RecordingIndicator::default());
        let shared = Arc::new(TimerShared::new(indicator.clone()));
        let mut rig = Self {
            app: AppService::new(config, Arc::clone(&shared)),
            hw: MockHardware::new(Arc::clone(&shared)),
            confirm: ScriptedConfirm::default(),
            render: RenderRecorder::default(),
            sink: EventRecorder::default(),
            shared,
            indicator,
        };
        rig.app.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    pub fn press(&mut self, ev: InputEvent) -> Flow {
        self.app
            .step(Some(ev), &mut self.hw, &mut self.confirm, &mut self.render, &mut self.sink)
    }

    pub fn short(&mut self, key: Key) -> Flow {
        self.press(InputEvent::short(key))
    }

    /// Let `ms` of virtual time pass, then run one idle loop iteration.
    pub fn advance(&mut self, ms: u64) -> Flow {
        self.hw.timers.advance(ms);
        self.app.step(None, &mut self.hw, &mut self.confirm, &mut self.render, &mut self.sink)
    }

    /// Move the list cursor down until it sits on `row`.
    pub fn cursor_to(&mut self, row: u8) {
        for _ in 0..16 {
            if self.app.snapshot().cursor.row() == row {
                return;
            }
            self.short(Key::Down);
        }
        panic!("cursor never reached row {row}");
    }

    /// From the boot screen: pick `profile` and land on the menu.
    pub fn choose(&mut self, profile: InverterProfile) {
        if profile == InverterProfile::Samsung {
            self.short(Key::Down);
        }
        self.short(Key::Ok);
    }

    /// From the unpowered menu: accept the power-on prompt.
    pub fn power_on(&mut self) {
        self.confirm.answers.push_back(true);
        self.cursor_to(0);
        self.short(Key::Ok);
    }

    /// Boot straight into the powered Embraco menu.
    pub fn powered_embraco() -> Self {
        let mut rig = Self::new();
        rig.choose(InverterProfile::Embraco);
        rig.power_on();
        rig
    }

    /// From the powered menu: run mode `id`.
    pub fn run_mode(&mut self, id: u8) {
        self.cursor_to(id);
        self.short(Key::Ok);
    }

    pub fn last_frame(&self) -> &ScreenView {
        self.render.frames.last().expect("nothing rendered yet")
    }
}
