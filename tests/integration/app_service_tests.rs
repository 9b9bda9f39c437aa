//! Integration tests for the AppService → FSM → controller → adapters
//! pipeline: navigation, power-up, speed modes, help and exit.

use ics_starter::app::events::AppEvent;
use ics_starter::app::ports::Prompt;
use ics_starter::app::service::Flow;
use ics_starter::drivers::pwm_output::OutputState;
use ics_starter::events::{InputEvent, Key};
use ics_starter::fsm::ScreenId;
use ics_starter::fsm::context::InverterProfile;
use ics_starter::fsm::screens;
use ics_starter::timers::TimerId;
use ics_starter::ui::EXIT_HINT;
use ics_starter::ui::help::{self, HelpLayout};

use super::mock_hw::{ActuatorCall, Rig};

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boots_on_inverter_selection_with_outputs_parked() {
    let rig = Rig::new();
    assert_eq!(rig.app.screen(), ScreenId::SelectInverter);
    assert_eq!(rig.sink.events, [AppEvent::Started(ScreenId::SelectInverter)]);
    assert_eq!(rig.hw.output(), OutputState::Disconnected);
    assert!(!rig.hw.aux_on());
    assert!(!rig.indicator.is_on());
    assert!(!rig.app.snapshot().powered);
}

#[test]
fn first_idle_step_draws_once() {
    let mut rig = Rig::new();
    rig.advance(100);
    assert_eq!(rig.render.frames.len(), 1);
    assert_eq!(rig.last_frame().title.as_str(), "Inverter type");
    rig.advance(100);
    assert_eq!(rig.render.frames.len(), 1, "nothing changed, no redraw");
}

#[test]
fn choosing_a_profile_lands_on_unpowered_menu() {
    let mut rig = Rig::new();
    rig.choose(InverterProfile::Samsung);

    assert_eq!(rig.app.screen(), ScreenId::Menu);
    let s = rig.app.snapshot();
    assert_eq!(s.profile, InverterProfile::Samsung);
    assert!(!s.powered);
    assert_eq!(s.cursor.row(), 0);
    assert!(rig.sink.contains(&AppEvent::ProfileSelected(InverterProfile::Samsung)));
    assert!(rig.sink.contains(&AppEvent::ScreenChanged {
        from: ScreenId::SelectInverter,
        to: ScreenId::Menu,
    }));

    let labels: Vec<_> = rig.last_frame().rows.iter().map(|r| r.label).collect();
    assert_eq!(labels, ["Power on", "Settings", "Help"]);
    assert_eq!(rig.last_frame().title.as_str(), "Samsung Starter");
}

#[test]
fn selection_list_wraps() {
    let mut rig = Rig::new();
    rig.short(Key::Up);
    assert_eq!(rig.app.snapshot().cursor.row(), 1);
    rig.press(InputEvent::repeat(Key::Down));
    assert_eq!(rig.app.snapshot().cursor.row(), 0);
}

// ── Exit hint ─────────────────────────────────────────────────

#[test]
fn short_back_shows_exit_hint_for_a_while() {
    let mut rig = Rig::new();
    rig.short(Key::Back);
    assert_eq!(rig.app.screen(), ScreenId::SelectInverter);
    assert_eq!(rig.last_frame().hint, Some(EXIT_HINT));

    rig.advance(1499);
    assert!(rig.shared.hint_visible());
    rig.advance(1);
    assert!(!rig.shared.hint_visible());
    assert_eq!(rig.last_frame().hint, None);
}

// ── Power on ──────────────────────────────────────────────────

#[test]
fn confirmed_power_on_idles_in_stand_by() {
    let rig = Rig::powered_embraco();

    assert_eq!(rig.confirm.prompts, [Prompt::PowerOn]);
    let s = rig.app.snapshot();
    assert!(s.powered);
    assert_eq!(s.active_mode, 0);
    assert_eq!(rig.hw.output(), OutputState::SafeLow);
    assert!(!rig.hw.aux_on(), "Embraco runs without the aux rail");
    assert!(rig.sink.contains(&AppEvent::PoweredOn(InverterProfile::Embraco)));
    assert_eq!(rig.app.countdown_ms(), None);

    let labels: Vec<_> = rig.last_frame().rows.iter().map(|r| r.label).collect();
    assert_eq!(labels, ["Stand by", "Low speed", "Mid speed", "Max speed"]);
    assert!(rig.last_frame().rows[0].checked);
}

#[test]
fn samsung_power_on_enables_aux_rail() {
    let mut rig = Rig::new();
    rig.choose(InverterProfile::Samsung);
    rig.power_on();
    assert!(rig.hw.aux_on());
}

#[test]
fn declined_power_on_keeps_outputs_parked() {
    let mut rig = Rig::new();
    rig.choose(InverterProfile::Embraco);
    rig.confirm.answers.push_back(false);
    rig.short(Key::Ok);

    assert!(!rig.app.snapshot().powered);
    assert_eq!(rig.hw.output(), OutputState::Disconnected);
    assert!(rig.sink.contains(&AppEvent::ConfirmDeclined(Prompt::PowerOn)));
    assert_eq!(rig.app.screen(), ScreenId::Menu);
}

// ── Speed modes ───────────────────────────────────────────────

#[test]
fn mode_drives_signal_countdown_and_blink() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(1);

    assert_eq!(rig.hw.output(), OutputState::Signal { freq_hz: 55 });
    assert!(rig.sink.contains(&AppEvent::ModeApplied { mode: 1, pwm_hz: 55 }));
    assert!(rig.sink.contains(&AppEvent::CountdownArmed { mode: 1, duration_ms: 120_000 }));
    assert_eq!(rig.shared.remaining_ms(), 120_000);
    assert_eq!(rig.app.blink_rate_hz(), 1);
    assert_eq!(rig.hw.timers.period_ms(TimerId::IndicatorBlink), Some(500));
    assert_eq!(rig.last_frame().timer.as_ref().map(|t| t.as_str()), Some("120s"));

    rig.advance(1000);
    assert_eq!(rig.shared.remaining_ms(), 119_000);
    assert_eq!(rig.last_frame().timer.as_ref().map(|t| t.as_str()), Some("119s"));
}

#[test]
fn signal_is_stopped_before_every_reconfiguration() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(3);
    rig.hw.clear_calls();
    rig.run_mode(2);

    let start = rig
        .hw
        .calls
        .iter()
        .position(|c| *c == ActuatorCall::StartSignal(100))
        .expect("mid speed started");
    assert_eq!(rig.hw.calls[..start], [ActuatorCall::StopSignal]);
    assert_eq!(rig.app.countdown_ms(), Some(60_000), "budget restarts for the new mode");
}

#[test]
fn stand_by_row_stops_signal_and_countdown() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(2);
    rig.run_mode(0);

    assert_eq!(rig.hw.output(), OutputState::SafeLow);
    assert_eq!(rig.app.countdown_ms(), None);
    assert_eq!(rig.shared.remaining_ms(), 0);
    assert!(!rig.hw.timers.is_running(TimerId::CountdownExpiry));
    assert!(!rig.hw.timers.is_running(TimerId::IndicatorBlink));
    assert!(!rig.indicator.is_on());
    assert_eq!(rig.last_frame().timer, None);
}

#[test]
fn menu_ignores_repeats_and_long_presses() {
    let mut rig = Rig::powered_embraco();
    rig.press(InputEvent::repeat(Key::Down));
    rig.press(InputEvent::long(Key::Ok));
    assert_eq!(rig.app.snapshot().cursor.row(), 0);
    assert_eq!(rig.app.snapshot().active_mode, 0);
}

#[test]
fn unknown_mode_leaves_outputs_and_countdown_alone() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(2);
    rig.advance(5_000);
    rig.hw.clear_calls();
    rig.sink.clear();
    let before = rig.app.snapshot();
    let rate = rig.app.blink_rate_hz();

    assert!(!rig.app.apply_mode(9, &mut rig.hw, &mut rig.sink));

    assert!(rig.hw.calls.is_empty());
    assert!(rig.sink.events.is_empty());
    let after = rig.app.snapshot();
    assert_eq!(after.active_mode, 2);
    assert_eq!(after.remaining_ms, before.remaining_ms);
    assert_eq!(rig.app.countdown_ms(), Some(60_000));
    assert_eq!(rig.app.blink_rate_hz(), rate);
    assert!(rig.hw.timers.is_running(TimerId::CountdownExpiry));
    assert_eq!(rig.hw.timers.deadline_ms(TimerId::CountdownExpiry), Some(60_000));
}

// ── Power off ─────────────────────────────────────────────────

#[test]
fn power_off_row_returns_to_safe_unpowered_menu() {
    let mut rig = Rig::new();
    rig.choose(InverterProfile::Samsung);
    rig.power_on();
    rig.run_mode(3);
    rig.cursor_to(screens::MENU_POWER_OFF_ROW);
    rig.short(Key::Ok);

    let s = rig.app.snapshot();
    assert!(!s.powered);
    assert_eq!(s.cursor.row(), 0);
    assert_eq!(rig.app.screen(), ScreenId::Menu);
    assert_eq!(rig.hw.output(), OutputState::Disconnected);
    assert!(!rig.hw.aux_on());
    assert_eq!(rig.app.countdown_ms(), None);
    assert!(!rig.indicator.is_on());
    assert_eq!(rig.last_frame().rows.len(), 3);
}

// ── Help ──────────────────────────────────────────────────────

#[test]
fn help_from_powered_menu_parks_outputs_first() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(1);
    rig.cursor_to(screens::MENU_HELP_ROW);
    rig.short(Key::Ok);

    assert_eq!(rig.app.screen(), ScreenId::Help);
    assert!(!rig.app.snapshot().powered);
    assert_eq!(rig.hw.output(), OutputState::Disconnected);
    assert!(rig.sink.contains(&AppEvent::SafeEntered));

    rig.short(Key::Back);
    assert_eq!(rig.app.screen(), ScreenId::Menu);
    assert_eq!(rig.last_frame().rows[0].label, "Power on");
}

#[test]
fn help_scrolls_within_bounds() {
    let mut rig = Rig::new();
    rig.choose(InverterProfile::Embraco);
    rig.cursor_to(screens::MENU_UNPOWERED_HELP_ROW);
    rig.short(Key::Ok);
    assert_eq!(rig.app.screen(), ScreenId::Help);

    rig.short(Key::Up);
    assert_eq!(rig.app.snapshot().help_top_line, 0);

    let cfg = rig.app.config().clone();
    let max = HelpLayout::compute(
        help::lines(InverterProfile::Embraco).len(),
        cfg.screen_height_px,
        cfg.help_top_margin_px,
        cfg.help_line_height_px,
    )
    .max_top_line;
    for _ in 0..usize::from(max) + 5 {
        rig.press(InputEvent::repeat(Key::Down));
    }
    assert_eq!(rig.app.snapshot().help_top_line, max);
    let last = *help::EMBRACO_HELP.last().unwrap();
    assert_eq!(rig.last_frame().help_lines.last().copied(), Some(last));
}

#[test]
fn help_restarts_at_top() {
    let mut rig = Rig::new();
    rig.choose(InverterProfile::Embraco);
    rig.cursor_to(screens::MENU_UNPOWERED_HELP_ROW);
    rig.short(Key::Ok);
    rig.short(Key::Down);
    rig.short(Key::Down);
    rig.short(Key::Back);
    rig.short(Key::Ok);
    assert_eq!(rig.app.snapshot().help_top_line, 0);
}

// ── Exit ──────────────────────────────────────────────────────

#[test]
fn long_back_exits_from_any_screen() {
    let mut rig = Rig::new();
    assert_eq!(rig.press(InputEvent::long(Key::Back)), Flow::Exit);

    let mut rig = Rig::new();
    rig.choose(InverterProfile::Embraco);
    rig.short(Key::Down);
    rig.short(Key::Ok);
    assert_eq!(rig.app.screen(), ScreenId::Settings);
    assert_eq!(rig.press(InputEvent::long(Key::Back)), Flow::Exit);
}

#[test]
fn shutdown_releases_everything() {
    let mut rig = Rig::new();
    rig.choose(InverterProfile::Samsung);
    rig.power_on();
    rig.run_mode(3);
    rig.short(Key::Back);
    rig.advance(125);

    assert_eq!(rig.press(InputEvent::long(Key::Back)), Flow::Exit);
    assert_eq!(
        rig.hw.output(),
        OutputState::Signal { freq_hz: 160 },
        "exit alone leaves outputs to shutdown"
    );

    rig.app.shutdown(&mut rig.hw, &mut rig.sink);
    assert_eq!(rig.sink.events.last(), Some(&AppEvent::Shutdown));
    assert_eq!(rig.hw.output(), OutputState::Disconnected);
    assert!(!rig.hw.aux_on());
    assert!(!rig.indicator.is_on());
    for id in TimerId::ALL {
        assert!(!rig.hw.timers.is_running(id), "{} still running", id.name());
    }
    assert!(!rig.shared.hint_visible());
}
