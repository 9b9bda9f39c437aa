//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the screen FSM, the mode controller and the shared
//! context.  It exposes a clean, hardware-agnostic API.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  InputEvent ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                 │         AppService         │ ──▶ RenderPort
//!  ConfirmPort ◀─▶│  Screen FSM · Controller   │
//!                 └────────────────────────────┘
//!                      │                 ▲
//!         ActuatorPort + TimerPort   TimerShared (flags from callbacks)
//! ```

use std::sync::Arc;

use log::{debug, info};

use crate::config::ControllerConfig;
use crate::control::controller::ModeController;
use crate::control::modes;
use crate::events::InputEvent;
use crate::fsm::context::{ApplicationState, FsmContext, InverterProfile};
use crate::fsm::screens::build_screen_table;
use crate::fsm::{Fsm, ScreenId};
use crate::timers::{TimerId, TimerShared};
use crate::ui::{self, ScreenView};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, ConfirmPort, EventSink, Prompt, RenderPort, TimerPort};

/// Whether the main loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    controller: ModeController,
    shared: Arc<TimerShared>,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the outputs; call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig, shared: Arc<TimerShared>) -> Self {
        Self {
            fsm: Fsm::new(build_screen_table(), ScreenId::SelectInverter),
            ctx: FsmContext::new(config),
            controller: ModeController::new(Arc::clone(&shared)),
            shared,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Park the outputs and show the inverter selection screen.
    pub fn start(&mut self, hw: &mut (impl ActuatorPort + TimerPort), sink: &mut impl EventSink) {
        self.controller.enter_safe(&mut self.ctx, hw);
        self.fsm.start(&mut self.ctx);
        self.shared.request_redraw();
        sink.emit(&AppEvent::Started(self.fsm.current_screen()));
        info!("AppService started on {:?}", self.fsm.current_screen());
    }

    /// Release every output and timer.  Call once after [`Flow::Exit`].
    pub fn shutdown(&mut self, hw: &mut (impl ActuatorPort + TimerPort), sink: &mut impl EventSink) {
        self.controller.shutdown(hw);
        self.ctx.powered = false;
        sink.emit(&AppEvent::Shutdown);
        info!("AppService shut down");
    }

    // ── Main-loop iteration ───────────────────────────────────

    /// One main-loop iteration: consume a countdown expiry, dispatch the
    /// input (if any), then redraw when anything changed.
    pub fn step(
        &mut self,
        input: Option<InputEvent>,
        hw: &mut (impl ActuatorPort + TimerPort),
        confirm: &mut impl ConfirmPort,
        render: &mut impl RenderPort,
        sink: &mut impl EventSink,
    ) -> Flow {
        let mut redraw = self.poll_timers(hw, sink);

        if let Some(ev) = input {
            if self.handle_input(ev, hw, confirm, sink) == Flow::Exit {
                return Flow::Exit;
            }
            redraw = true;
        }

        if self.shared.take_redraw() || redraw {
            render.render(&self.view());
        }
        Flow::Continue
    }

    /// Fall back to powered idle if the running countdown expired since
    /// the last call.  Returns `true` if it did.
    pub fn poll_timers(
        &mut self,
        hw: &mut (impl ActuatorPort + TimerPort),
        sink: &mut impl EventSink,
    ) -> bool {
        let Some(epoch) = self.shared.take_expiry() else {
            return false;
        };
        if !self.controller.owns_expiry(epoch) {
            debug!("ignoring expiry of retired countdown (epoch {})", epoch);
            return false;
        }
        let mode = self.ctx.active_mode;
        info!("countdown expired in {}, returning to idle", modes::label(mode));
        sink.emit(&AppEvent::CountdownExpired { mode });
        self.controller.enter_powered_idle(&mut self.ctx, hw);
        sink.emit(&AppEvent::ModeApplied { mode: self.ctx.active_mode, pwm_hz: 0 });
        true
    }

    /// Dispatch one input event.  A long Back exits from any screen; the
    /// outputs are left untouched until [`shutdown`](Self::shutdown).
    pub fn handle_input(
        &mut self,
        ev: InputEvent,
        hw: &mut (impl ActuatorPort + TimerPort),
        confirm: &mut impl ConfirmPort,
        sink: &mut impl EventSink,
    ) -> Flow {
        if ev.is_exit() {
            info!("exit requested from {:?}", self.fsm.current_screen());
            return Flow::Exit;
        }

        let before = self.fsm.current_screen();
        if let Some(cmd) = self.fsm.handle_input(&mut self.ctx, ev) {
            debug!("screen {:?} raised {:?}", before, cmd);
            self.execute(cmd, hw, confirm, sink);
        }

        let after = self.fsm.current_screen();
        if after != before {
            sink.emit(&AppEvent::ScreenChanged { from: before, to: after });
        }
        Flow::Continue
    }

    /// Run mode `mode`.  Unknown ids leave every output untouched and
    /// return `false`.
    pub fn apply_mode(
        &mut self,
        mode: modes::ModeId,
        hw: &mut (impl ActuatorPort + TimerPort),
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.controller.apply_mode(&mut self.ctx, mode, hw) {
            return false;
        }
        let pwm_hz = modes::mode(mode).map_or(0, |m| m.pwm_hz);
        sink.emit(&AppEvent::ModeApplied { mode, pwm_hz });
        self.emit_countdown_armed(sink);
        true
    }

    // ── Queries ───────────────────────────────────────────────

    /// Point-in-time snapshot of all observable state.
    pub fn snapshot(&self) -> ApplicationState {
        ApplicationState {
            screen: self.fsm.current_screen(),
            profile: self.ctx.profile,
            powered: self.ctx.powered,
            cursor: self.ctx.cursor,
            active_mode: self.ctx.active_mode,
            help_top_line: self.ctx.help_top_line,
            limit_runtime: self.ctx.limit_runtime,
            arrow_captcha: self.ctx.arrow_captcha,
            remaining_ms: self.shared.remaining_ms(),
            timeout_expired: self.shared.timeout_expired(),
            indicator_on: self.shared.indicator_on(),
            hint_visible: self.shared.hint_visible(),
        }
    }

    /// What the panel shows right now.
    pub fn view(&self) -> ScreenView {
        ui::build_view(&self.snapshot(), &self.ctx.config)
    }

    /// Current screen.
    pub fn screen(&self) -> ScreenId {
        self.fsm.current_screen()
    }

    /// Budget of the running countdown, if any.
    pub fn countdown_ms(&self) -> Option<u32> {
        self.controller.countdown_ms()
    }

    /// Active indicator blink rate.
    pub fn blink_rate_hz(&self) -> u8 {
        self.controller.blink_rate_hz()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn execute(
        &mut self,
        cmd: AppCommand,
        hw: &mut (impl ActuatorPort + TimerPort),
        confirm: &mut impl ConfirmPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::CommitProfile(profile) | AppCommand::SwitchProfile(profile) => {
                self.select_profile(profile, hw, sink);
            }
            AppCommand::RequestPowerOn => {
                if confirm.confirm(Prompt::PowerOn) {
                    self.controller.enter_powered_idle(&mut self.ctx, hw);
                    sink.emit(&AppEvent::PoweredOn(self.ctx.profile));
                } else {
                    sink.emit(&AppEvent::ConfirmDeclined(Prompt::PowerOn));
                }
            }
            AppCommand::PowerOff => {
                self.controller.enter_safe(&mut self.ctx, hw);
                sink.emit(&AppEvent::SafeEntered);
            }
            AppCommand::ApplyMode(mode) => {
                self.apply_mode(mode, hw, sink);
            }
            AppCommand::OpenHelpSafely => {
                self.controller.enter_safe(&mut self.ctx, hw);
                sink.emit(&AppEvent::SafeEntered);
                self.fsm.force_transition(ScreenId::Help, &mut self.ctx);
            }
            AppCommand::RequestDisableRuntimeLimit => {
                if confirm.confirm(Prompt::DisableRuntimeLimit) {
                    // The countdown may have run out while the dialog was up.
                    self.poll_timers(hw, sink);
                    self.ctx.limit_runtime = false;
                    self.controller.cancel_countdown(hw);
                    sink.emit(&AppEvent::RuntimeLimitChanged(false));
                } else {
                    sink.emit(&AppEvent::ConfirmDeclined(Prompt::DisableRuntimeLimit));
                }
            }
            AppCommand::EnableRuntimeLimit => {
                self.ctx.limit_runtime = true;
                self.controller.rearm_countdown(&self.ctx, hw);
                sink.emit(&AppEvent::RuntimeLimitChanged(true));
                self.emit_countdown_armed(sink);
            }
            AppCommand::ShowExitHint => {
                self.shared.show_hint();
                hw.start_once(TimerId::HintHide, self.ctx.config.hint_duration_ms);
            }
        }
    }

    /// Adopt `profile`, park the outputs and land on the unpowered menu.
    fn select_profile(
        &mut self,
        profile: InverterProfile,
        hw: &mut (impl ActuatorPort + TimerPort),
        sink: &mut impl EventSink,
    ) {
        self.ctx.profile = profile;
        sink.emit(&AppEvent::ProfileSelected(profile));
        self.controller.enter_safe(&mut self.ctx, hw);
        sink.emit(&AppEvent::SafeEntered);
        self.fsm.force_transition(ScreenId::Menu, &mut self.ctx);
    }

    fn emit_countdown_armed(&self, sink: &mut impl EventSink) {
        if let Some(duration_ms) = self.controller.countdown_ms() {
            sink.emit(&AppEvent::CountdownArmed { mode: self.ctx.active_mode, duration_ms });
        }
    }
}
