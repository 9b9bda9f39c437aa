//! Screen view model.
//!
//! [`build_view`] turns an [`ApplicationState`] snapshot into a
//! fully-resolved [`ScreenView`]: title, countdown text, the visible window
//! of rows with caret and check marks, scrollbar position and the exit
//! hint.  Drawing backends only place these on the panel.

pub mod help;

use core::fmt::Write;

use heapless::{String, Vec};
use serde::Serialize;

use crate::config::ControllerConfig;
use crate::control::modes::{MODE_COUNT, MODES};
use crate::fsm::ScreenId;
use crate::fsm::context::{ApplicationState, InverterProfile};
use crate::fsm::screens::{self, SETTINGS_HEADER_ROW, SETTINGS_ROWS};
use help::HelpLayout;

/// Most list rows that can be on screen at once.
pub const MAX_VISIBLE_ROWS: usize = 6;

/// Most help lines that can be on screen at once.
pub const MAX_HELP_LINES: usize = 8;

pub const EXIT_HINT: &str = "Long press back to exit";

/// One drawn list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub label: &'static str,
    /// Caret shown.
    pub selected: bool,
    /// Check mark shown (active mode / active profile).
    pub checked: bool,
    /// Right-aligned value text ("Yes" / "No").
    pub value: Option<&'static str>,
    /// Non-selectable section header.
    pub header: bool,
}

impl RowView {
    fn item(label: &'static str, selected: bool) -> Self {
        Self { label, selected, checked: false, value: None, header: false }
    }
}

/// Dotted scrollbar: `pos` of `steps` positions.  Omitted for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scrollbar {
    pub steps: u16,
    pub pos: u16,
}

impl Scrollbar {
    fn new(steps: u16, pos: u16) -> Option<Self> {
        (steps > 1).then_some(Self { steps, pos })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenView {
    pub screen: ScreenId,
    pub title: String<32>,
    /// Countdown as whole seconds rounded up, e.g. `"30s"`.
    pub timer: Option<String<12>>,
    pub rows: Vec<RowView, MAX_VISIBLE_ROWS>,
    pub help_lines: Vec<&'static str, MAX_HELP_LINES>,
    pub scrollbar: Option<Scrollbar>,
    pub hint: Option<&'static str>,
}

impl ScreenView {
    fn new(screen: ScreenId) -> Self {
        Self {
            screen,
            title: String::new(),
            timer: None,
            rows: Vec::new(),
            help_lines: Vec::new(),
            scrollbar: None,
            hint: None,
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title.clear();
        let _ = self.title.push_str(title);
    }
}

/// `ceil(ms / 1000)` followed by `s`.
pub fn format_remaining(remaining_ms: u32) -> String<12> {
    let mut out = String::new();
    let _ = write!(out, "{}s", remaining_ms.div_ceil(1000));
    out
}

/// Resolve everything the panel shows for `state`.
pub fn build_view(state: &ApplicationState, config: &ControllerConfig) -> ScreenView {
    let mut view = ScreenView::new(state.screen);
    let visible = usize::from(config.visible_rows).min(MAX_VISIBLE_ROWS);

    match state.screen {
        ScreenId::SelectInverter => {
            view.set_title("Inverter type");
            for (row, profile) in InverterProfile::ALL.iter().enumerate() {
                let selected = row == usize::from(state.cursor.row());
                push_row(&mut view, RowView::item(profile.name(), selected));
            }
            view.scrollbar =
                Scrollbar::new(InverterProfile::ALL.len() as u16, state.cursor.row().into());
        }
        ScreenId::Menu => {
            let _ = write!(view.title, "{} Starter", state.profile.name());
            if state.remaining_ms > 0 {
                view.timer = Some(format_remaining(state.remaining_ms));
            }
            let total = screens::menu_rows(state.powered);
            for row in window(state.cursor.first_visible(), total, visible) {
                let selected = row == state.cursor.row();
                let mut item = RowView::item(menu_label(state.powered, row), selected);
                item.checked =
                    state.powered && row == state.active_mode && usize::from(row) < MODE_COUNT;
                push_row(&mut view, item);
            }
            view.scrollbar = Scrollbar::new(total.into(), state.cursor.row().into());
        }
        ScreenId::Settings => {
            view.set_title("Settings");
            for row in window(state.cursor.first_visible(), SETTINGS_ROWS, visible) {
                push_row(&mut view, settings_row(state, row));
            }
            view.scrollbar = Scrollbar::new(SETTINGS_ROWS.into(), state.cursor.row().into());
        }
        ScreenId::Help => {
            let lines = help::lines(state.profile);
            let layout = HelpLayout::compute(
                lines.len(),
                config.screen_height_px,
                config.help_top_margin_px,
                config.help_line_height_px,
            );
            for line in lines
                .iter()
                .copied()
                .skip(state.help_top_line.into())
                .take(layout.lines_that_fit.into())
            {
                if view.help_lines.push(line).is_err() {
                    break;
                }
            }
            view.scrollbar =
                Scrollbar::new(u16::from(layout.max_top_line) + 1, state.help_top_line.into());
        }
    }

    if state.hint_visible && matches!(state.screen, ScreenId::SelectInverter | ScreenId::Menu) {
        view.hint = Some(EXIT_HINT);
    }
    view
}

fn push_row(view: &mut ScreenView, row: RowView) {
    let _ = view.rows.push(row);
}

/// Rows `[first, first + visible)` with `first` clamped so the window
/// never runs past the end of the list.
fn window(first_visible: u8, total: u8, visible: usize) -> impl Iterator<Item = u8> {
    let visible = visible.max(1) as u8;
    let first = first_visible.min(total.saturating_sub(visible));
    (first..total).take(visible.into())
}

fn menu_label(powered: bool, row: u8) -> &'static str {
    if powered {
        match row {
            r if usize::from(r) < MODE_COUNT => MODES[usize::from(r)].name,
            screens::MENU_POWER_OFF_ROW => "Power off",
            screens::MENU_SETTINGS_ROW => "Settings",
            _ => "Help",
        }
    } else {
        match row {
            screens::MENU_POWER_ON_ROW => "Power on",
            screens::MENU_UNPOWERED_SETTINGS_ROW => "Settings",
            _ => "Help",
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn settings_row(state: &ApplicationState, row: u8) -> RowView {
    let selected = row == state.cursor.row();
    match row {
        screens::SETTINGS_LIMIT_ROW => RowView {
            value: Some(yes_no(state.limit_runtime)),
            ..RowView::item("Limit run time", selected)
        },
        screens::SETTINGS_CAPTCHA_ROW => RowView {
            value: Some(yes_no(state.arrow_captcha)),
            ..RowView::item("Arrow captcha", selected)
        },
        SETTINGS_HEADER_ROW => RowView {
            header: true,
            ..RowView::item("Inverter type", false)
        },
        screens::SETTINGS_EMBRACO_ROW => RowView {
            checked: state.profile == InverterProfile::Embraco,
            ..RowView::item("Embraco", selected)
        },
        _ => RowView {
            checked: state.profile == InverterProfile::Samsung,
            ..RowView::item("Samsung", selected)
        },
    }
}
