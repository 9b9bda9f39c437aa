//! Runtime countdown and indicator blink against the virtual clock.

use std::sync::Arc;
use std::time::Duration;

use ics_starter::app::events::AppEvent;
use ics_starter::app::ports::Prompt;
use ics_starter::control::countdown::TICK_PERIOD_MS;
use ics_starter::drivers::pwm_output::OutputState;
use ics_starter::events::{InputQueue, Key};
use ics_starter::fsm::ScreenId;
use ics_starter::fsm::screens;
use ics_starter::timers::TimerId;

use super::mock_hw::Rig;

#[test]
fn expiry_falls_back_to_powered_idle() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(3);
    assert_eq!(rig.app.countdown_ms(), Some(30_000));

    rig.advance(29_999);
    assert_eq!(rig.hw.output(), OutputState::Signal { freq_hz: 160 });
    assert_eq!(rig.shared.remaining_ms(), 1_000);

    rig.advance(1);
    let s = rig.app.snapshot();
    assert!(s.powered, "expiry keeps the profile powered");
    assert_eq!(s.active_mode, 0);
    assert_eq!(s.cursor.row(), 0);
    assert!(!s.timeout_expired, "flag consumed by the main loop");
    assert_eq!(rig.hw.output(), OutputState::SafeLow);
    assert_eq!(rig.app.countdown_ms(), None);
    assert_eq!(rig.app.blink_rate_hz(), 0);
    assert!(!rig.indicator.is_on());
    assert!(rig.sink.contains(&AppEvent::CountdownExpired { mode: 3 }));
    assert!(rig.sink.contains(&AppEvent::ModeApplied { mode: 0, pwm_hz: 0 }));
    assert_eq!(rig.last_frame().timer, None);
    assert!(rig.last_frame().rows[0].checked, "Stand by is active again");
}

#[test]
fn expiry_is_handled_once() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(2);
    rig.advance(60_000);
    let expiries = |rig: &Rig| {
        rig.sink
            .events
            .iter()
            .filter(|e| matches!(e, AppEvent::CountdownExpired { .. }))
            .count()
    };
    assert_eq!(expiries(&rig), 1);
    rig.advance(120_000);
    assert_eq!(expiries(&rig), 1);
}

#[test]
fn countdown_display_ticks_once_per_second() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(2);
    let frames = rig.render.frames.len();

    rig.advance(3_000);
    assert_eq!(rig.shared.remaining_ms(), 57_000);
    assert_eq!(rig.last_frame().timer.as_ref().map(|t| t.as_str()), Some("57s"));
    assert_eq!(rig.render.frames.len(), frames + 1, "one redraw per loop iteration");
}

#[test]
fn changing_mode_rearms_from_full_budget() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(1);
    rig.advance(100_000);
    rig.run_mode(3);
    assert_eq!(rig.shared.remaining_ms(), 30_000);
    rig.advance(29_000);
    assert_eq!(rig.hw.output(), OutputState::Signal { freq_hz: 160 });
    rig.advance(1_000);
    assert_eq!(rig.hw.output(), OutputState::SafeLow);
}

#[test]
fn leaving_power_discards_pending_expiry() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(3);
    rig.cursor_to(4);
    rig.short(Key::Ok);

    rig.advance(60_000);
    assert!(!rig.sink.contains(&AppEvent::CountdownExpired { mode: 3 }));
    assert!(!rig.app.snapshot().powered);
    assert_eq!(rig.hw.output(), OutputState::Disconnected);
}

#[test]
fn blink_rate_follows_mode() {
    let mut rig = Rig::powered_embraco();
    for (mode, period) in [(1, 500), (2, 250), (3, 125)] {
        rig.run_mode(mode);
        assert_eq!(rig.hw.timers.period_ms(TimerId::IndicatorBlink), Some(period));
        assert!(!rig.indicator.is_on(), "every rate change starts dark");
    }
}

#[test]
fn indicator_toggles_on_the_blink_timer() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(2);
    let writes = rig.indicator.writes();

    rig.advance(250);
    assert!(rig.indicator.is_on());
    rig.advance(250);
    assert!(!rig.indicator.is_on());
    assert_eq!(rig.indicator.writes(), writes + 2);
}

fn expiries(rig: &Rig) -> usize {
    rig.sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::CountdownExpired { .. }))
        .count()
}

/// Powered Embraco running `mode`, with the runtime-limit row highlighted.
fn on_limit_row(mode: u8) -> Rig {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(mode);
    rig.cursor_to(screens::MENU_SETTINGS_ROW);
    rig.short(Key::Ok);
    assert_eq!(rig.app.screen(), ScreenId::Settings);
    assert_eq!(rig.app.snapshot().cursor.row(), screens::SETTINGS_LIMIT_ROW);
    rig
}

#[test]
fn expiry_during_accepted_limit_prompt_still_stops_signal() {
    let mut rig = on_limit_row(1);
    rig.confirm.answers.push_back(true);
    rig.confirm.expire_while_open = Some(Arc::clone(&rig.shared));
    rig.short(Key::Ok);

    assert_eq!(rig.confirm.prompts.last(), Some(&Prompt::DisableRuntimeLimit));
    let s = rig.app.snapshot();
    assert!(!s.limit_runtime, "the answer is still applied");
    assert!(s.powered);
    assert_eq!(s.active_mode, 0);
    assert!(!s.timeout_expired);
    assert_eq!(rig.hw.output(), OutputState::SafeLow);
    assert_eq!(rig.app.countdown_ms(), None);
    assert!(rig.sink.contains(&AppEvent::CountdownExpired { mode: 1 }));
    assert_eq!(expiries(&rig), 1);
}

#[test]
fn expiry_during_declined_limit_prompt_is_handled_next_iteration() {
    let mut rig = on_limit_row(2);
    rig.confirm.answers.push_back(false);
    rig.confirm.expire_while_open = Some(Arc::clone(&rig.shared));
    rig.short(Key::Ok);
    assert!(rig.app.snapshot().timeout_expired);

    rig.advance(0);
    assert!(rig.app.snapshot().limit_runtime);
    assert_eq!(rig.app.snapshot().active_mode, 0);
    assert_eq!(rig.hw.output(), OutputState::SafeLow);
    assert_eq!(expiries(&rig), 1);
}

#[test]
fn late_expiry_of_replaced_countdown_is_ignored() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(3);
    let stale = rig.shared.countdown_epoch();
    rig.advance(10_000);
    rig.run_mode(1);

    // Already dispatched before the switch, delivered after it.
    rig.shared.on_fire(TimerId::CountdownExpiry, stale);
    rig.advance(0);
    assert_eq!(expiries(&rig), 0);
    assert_eq!(rig.hw.output(), OutputState::Signal { freq_hz: 55 });
    assert_eq!(rig.app.countdown_ms(), Some(120_000));
    assert_eq!(rig.shared.remaining_ms(), 120_000);

    rig.advance(119_999);
    assert_eq!(rig.hw.output(), OutputState::Signal { freq_hz: 55 });
    rig.advance(1);
    assert_eq!(rig.hw.output(), OutputState::SafeLow);
    assert_eq!(expiries(&rig), 1);
}

#[test]
fn repeated_expiry_after_fallback_does_not_touch_next_mode() {
    let mut rig = Rig::powered_embraco();
    rig.run_mode(2);
    let first = rig.shared.countdown_epoch();
    rig.advance(60_000);
    assert_eq!(expiries(&rig), 1);

    rig.run_mode(3);
    rig.shared.on_fire(TimerId::CountdownExpiry, first);
    rig.advance(0);
    assert_eq!(expiries(&rig), 1);
    assert_eq!(rig.hw.output(), OutputState::Signal { freq_hz: 160 });
    assert_eq!(rig.app.countdown_ms(), Some(30_000));
}

#[test]
fn fallback_lands_within_one_tick_of_the_polling_loop() {
    let queue = InputQueue::new();
    let poll = Duration::from_millis(100);
    let mut rig = Rig::powered_embraco();
    rig.run_mode(3);
    rig.advance(29_950);
    assert_eq!(rig.hw.output(), OutputState::Signal { freq_hz: 160 });

    let budget = (TICK_PERIOD_MS / 100) as usize;
    let mut iterations = 0;
    while rig.hw.output() != OutputState::SafeLow {
        assert!(iterations < budget, "no fallback after {} loop iterations", iterations);
        let input = queue.dequeue_timeout(poll);
        assert_eq!(input, None);
        rig.hw.timers.advance(100);
        rig.app.step(input, &mut rig.hw, &mut rig.confirm, &mut rig.render, &mut rig.sink);
        iterations += 1;
    }
    assert_eq!(rig.app.snapshot().active_mode, 0);
    assert!(rig.sink.contains(&AppEvent::CountdownExpired { mode: 3 }));
}
