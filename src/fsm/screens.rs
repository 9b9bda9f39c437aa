//! Concrete screen handler functions and table builder.
//!
//! Each screen is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.  Handlers move the cursor and scroll position
//! themselves; anything that touches outputs, timers or dialogs is returned
//! as an [`AppCommand`].
//!
//! ```text
//!  SELECT_INVERTER ──[Ok]──▶ MENU ◀──[Back]── SETTINGS
//!                             │ ▲                ▲
//!                      [Help] │ │ [Back]         │ [Settings]
//!                             ▼ │                │
//!                             HELP          MENU ┘
//!
//!  Any screen ──[long Back]──▶ exit
//! ```

use super::context::{FsmContext, InverterProfile};
use super::cursor::ListShape;
use super::{ScreenDescriptor, ScreenId, Transition};
use crate::app::commands::AppCommand;
use crate::control::modes::{MODE_COUNT, ModeId};
use crate::events::{InputEvent, Key, PressKind};

// ═══════════════════════════════════════════════════════════════════════════
//  Row layout
// ═══════════════════════════════════════════════════════════════════════════

/// Powered menu: one row per mode, then these.
pub const MENU_POWER_OFF_ROW: u8 = MODE_COUNT as u8;
pub const MENU_SETTINGS_ROW: u8 = MODE_COUNT as u8 + 1;
pub const MENU_HELP_ROW: u8 = MODE_COUNT as u8 + 2;
pub const MENU_POWERED_ROWS: u8 = MODE_COUNT as u8 + 3;

/// Unpowered menu.
pub const MENU_POWER_ON_ROW: u8 = 0;
pub const MENU_UNPOWERED_SETTINGS_ROW: u8 = 1;
pub const MENU_UNPOWERED_HELP_ROW: u8 = 2;
pub const MENU_UNPOWERED_ROWS: u8 = 3;

/// Settings.
pub const SETTINGS_LIMIT_ROW: u8 = 0;
pub const SETTINGS_CAPTCHA_ROW: u8 = 1;
pub const SETTINGS_HEADER_ROW: u8 = 2;
pub const SETTINGS_EMBRACO_ROW: u8 = 3;
pub const SETTINGS_SAMSUNG_ROW: u8 = 4;
pub const SETTINGS_ROWS: u8 = 5;

fn settings_row_selectable(row: u8) -> bool {
    row != SETTINGS_HEADER_ROW
}

/// Row set of a list screen; `None` for Help, which scrolls by line.
pub fn list_shape(screen: ScreenId, ctx: &FsmContext) -> Option<ListShape> {
    let visible = ctx.config.visible_rows;
    match screen {
        ScreenId::SelectInverter => {
            Some(ListShape::uniform(InverterProfile::ALL.len() as u8, visible))
        }
        ScreenId::Menu => Some(ListShape::uniform(menu_rows(ctx.powered), visible)),
        ScreenId::Settings => Some(ListShape {
            rows: SETTINGS_ROWS,
            visible,
            selectable: settings_row_selectable,
        }),
        ScreenId::Help => None,
    }
}

pub const fn menu_rows(powered: bool) -> u8 {
    if powered { MENU_POWERED_ROWS } else { MENU_UNPOWERED_ROWS }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static screen table.  Called once at startup.
pub fn build_screen_table() -> [ScreenDescriptor; ScreenId::COUNT] {
    [
        // Index 0: SelectInverter
        ScreenDescriptor {
            id: ScreenId::SelectInverter,
            name: "SelectInverter",
            on_enter: None,
            on_exit: None,
            on_input: select_inverter_input,
        },
        // Index 1: Menu
        ScreenDescriptor {
            id: ScreenId::Menu,
            name: "Menu",
            on_enter: Some(menu_enter),
            on_exit: None,
            on_input: menu_input,
        },
        // Index 2: Help
        ScreenDescriptor {
            id: ScreenId::Help,
            name: "Help",
            on_enter: Some(help_enter),
            on_exit: None,
            on_input: help_input,
        },
        // Index 3: Settings
        ScreenDescriptor {
            id: ScreenId::Settings,
            name: "Settings",
            on_enter: Some(settings_reset_cursor),
            on_exit: Some(settings_reset_cursor),
            on_input: settings_input,
        },
    ]
}

/// Move the list cursor for Up/Down on `screen`.  Returns `true` if the
/// key was a navigation key.
fn navigate(screen: ScreenId, ctx: &mut FsmContext, key: Key) -> bool {
    let Some(shape) = list_shape(screen, ctx) else {
        return false;
    };
    match key {
        Key::Up => ctx.cursor.up(&shape),
        Key::Down => ctx.cursor.down(&shape),
        _ => return false,
    }
    true
}

// ═══════════════════════════════════════════════════════════════════════════
//  SELECT_INVERTER
// ═══════════════════════════════════════════════════════════════════════════

fn select_inverter_input(ctx: &mut FsmContext, ev: InputEvent) -> Transition {
    if !ev.is_short_or_repeat() || navigate(ScreenId::SelectInverter, ctx, ev.key) {
        return Transition::Stay;
    }
    match ev.key {
        Key::Ok => Transition::Run(AppCommand::CommitProfile(InverterProfile::from_row(
            ctx.cursor.row(),
        ))),
        Key::Back => Transition::Run(AppCommand::ShowExitHint),
        _ => Transition::Stay,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  MENU
// ═══════════════════════════════════════════════════════════════════════════

fn menu_enter(ctx: &mut FsmContext) {
    if let Some(shape) = list_shape(ScreenId::Menu, ctx) {
        ctx.cursor.clamp(&shape);
    }
}

fn menu_input(ctx: &mut FsmContext, ev: InputEvent) -> Transition {
    if ev.kind != PressKind::Short || navigate(ScreenId::Menu, ctx, ev.key) {
        return Transition::Stay;
    }
    match ev.key {
        Key::Ok if ctx.powered => powered_menu_select(ctx.cursor.row()),
        Key::Ok => unpowered_menu_select(ctx.cursor.row()),
        Key::Back => Transition::Run(AppCommand::ShowExitHint),
        _ => Transition::Stay,
    }
}

fn powered_menu_select(row: u8) -> Transition {
    match row {
        r if usize::from(r) < MODE_COUNT => Transition::Run(AppCommand::ApplyMode(r as ModeId)),
        MENU_POWER_OFF_ROW => Transition::Run(AppCommand::PowerOff),
        MENU_SETTINGS_ROW => Transition::Goto(ScreenId::Settings),
        MENU_HELP_ROW => Transition::Run(AppCommand::OpenHelpSafely),
        _ => Transition::Stay,
    }
}

fn unpowered_menu_select(row: u8) -> Transition {
    match row {
        MENU_POWER_ON_ROW => Transition::Run(AppCommand::RequestPowerOn),
        MENU_UNPOWERED_SETTINGS_ROW => Transition::Goto(ScreenId::Settings),
        MENU_UNPOWERED_HELP_ROW => Transition::Goto(ScreenId::Help),
        _ => Transition::Stay,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  HELP
// ═══════════════════════════════════════════════════════════════════════════

fn help_enter(ctx: &mut FsmContext) {
    ctx.help_top_line = 0;
}

fn help_input(ctx: &mut FsmContext, ev: InputEvent) -> Transition {
    if !ev.is_short_or_repeat() {
        return Transition::Stay;
    }
    match ev.key {
        Key::Up => {
            ctx.help_top_line = ctx.help_top_line.saturating_sub(1);
            Transition::Stay
        }
        Key::Down => {
            if ctx.help_top_line < ctx.help_layout().max_top_line {
                ctx.help_top_line += 1;
            }
            Transition::Stay
        }
        Key::Back => Transition::Goto(ScreenId::Menu),
        _ => Transition::Stay,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  SETTINGS
// ═══════════════════════════════════════════════════════════════════════════

fn settings_reset_cursor(ctx: &mut FsmContext) {
    if let Some(shape) = list_shape(ScreenId::Settings, ctx) {
        ctx.cursor.reset(&shape);
    }
}

fn settings_input(ctx: &mut FsmContext, ev: InputEvent) -> Transition {
    if ev.kind != PressKind::Short || navigate(ScreenId::Settings, ctx, ev.key) {
        return Transition::Stay;
    }
    match ev.key {
        Key::Ok => settings_select(ctx),
        Key::Back => Transition::Goto(ScreenId::Menu),
        _ => Transition::Stay,
    }
}

fn settings_select(ctx: &mut FsmContext) -> Transition {
    let current = ctx.profile;
    let profile_row = |p: InverterProfile| {
        if current == p {
            Transition::Stay
        } else {
            Transition::Run(AppCommand::SwitchProfile(p))
        }
    };
    match ctx.cursor.row() {
        SETTINGS_LIMIT_ROW if ctx.limit_runtime => {
            Transition::Run(AppCommand::RequestDisableRuntimeLimit)
        }
        SETTINGS_LIMIT_ROW => Transition::Run(AppCommand::EnableRuntimeLimit),
        SETTINGS_CAPTCHA_ROW => {
            ctx.arrow_captcha = !ctx.arrow_captcha;
            Transition::Stay
        }
        SETTINGS_EMBRACO_ROW => profile_row(InverterProfile::Embraco),
        SETTINGS_SAMSUNG_ROW => profile_row(InverterProfile::Samsung),
        _ => Transition::Stay,
    }
}
