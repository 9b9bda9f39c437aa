//! Function-pointer screen state machine.
//!
//! Classic embedded FSM pattern, driven by input events instead of ticks:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  ScreenTable                                                     │
//! │  ┌────────────────┬──────────┬──────────┬──────────────────────┐ │
//! │  │ ScreenId       │ on_enter │ on_exit  │ on_input             │ │
//! │  ├────────────────┼──────────┼──────────┼──────────────────────┤ │
//! │  │ SelectInverter │    -     │    -     │ fn(ctx,ev)->Transition│ │
//! │  │ Menu           │ fn(ctx)  │    -     │ fn(ctx,ev)->Transition│ │
//! │  │ Help           │ fn(ctx)  │    -     │ fn(ctx,ev)->Transition│ │
//! │  │ Settings       │ fn(ctx)  │ fn(ctx)  │ fn(ctx,ev)->Transition│ │
//! │  └────────────────┴──────────┴──────────┴──────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! For each input the engine calls `on_input` for the **current** screen.
//! A [`Transition::Goto`] runs `on_exit` for the current screen, then
//! `on_enter` for the next.  A [`Transition::Run`] hands an
//! [`AppCommand`] back to the caller, which owns the hardware and decides
//! where to go next via [`Fsm::force_transition`].

pub mod context;
pub mod cursor;
pub mod screens;

use context::FsmContext;
use log::info;
use serde::Serialize;

use crate::app::commands::AppCommand;
use crate::events::InputEvent;

// ---------------------------------------------------------------------------
// Screen identity
// ---------------------------------------------------------------------------

/// Enumeration of all screens.
/// Must stay in sync with the table built in [`screens::build_screen_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ScreenId {
    SelectInverter = 0,
    Menu = 1,
    Help = 2,
    Settings = 3,
}

impl ScreenId {
    /// Total number of screens, used to size the table array.
    pub const COUNT: usize = 4;
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type ScreenActionFn = fn(&mut FsmContext);

/// Signature for the per-input handler.
pub type ScreenInputFn = fn(&mut FsmContext, InputEvent) -> Transition;

/// Outcome of a screen input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stay on the current screen (possibly after moving the cursor).
    Stay,
    /// Navigate to another screen with no side effects.
    Goto(ScreenId),
    /// Hand a side-effecting command to the application service.
    Run(AppCommand),
}

// ---------------------------------------------------------------------------
// Screen descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single screen.
pub struct ScreenDescriptor {
    pub id: ScreenId,
    pub name: &'static str,
    pub on_enter: Option<ScreenActionFn>,
    pub on_exit: Option<ScreenActionFn>,
    pub on_input: ScreenInputFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The screen state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `ScreenId as usize`.
    table: [ScreenDescriptor; ScreenId::COUNT],
    /// Index of the currently shown screen.
    current: usize,
}

impl Fsm {
    /// Construct a new FSM with the given screen table, starting on `initial`.
    pub fn new(table: [ScreenDescriptor; ScreenId::COUNT], initial: ScreenId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting screen.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting on screen: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Dispatch one input to the current screen.
    ///
    /// Navigation is applied here; side-effecting commands are returned.
    pub fn handle_input(&mut self, ctx: &mut FsmContext, event: InputEvent) -> Option<AppCommand> {
        match (self.table[self.current].on_input)(ctx, event) {
            Transition::Stay => None,
            Transition::Goto(next) => {
                self.force_transition(next, ctx);
                None
            }
            Transition::Run(cmd) => Some(cmd),
        }
    }

    /// Switch screens unless already there.
    pub fn force_transition(&mut self, next: ScreenId, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current screen's identity.
    pub fn current_screen(&self) -> ScreenId {
        self.table[self.current].id
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: ScreenId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
