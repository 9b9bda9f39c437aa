//! ICS Starter Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single blocking main loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter         LogEventSink   LogRenderer            │
//! │  (Actuator + Timer)      (EventSink)    (RenderPort)           │
//! │  QueueConfirm            StatusLed                             │
//! │  (ConfirmPort)           (IndicatorPort, timer context)        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Screen FSM · Mode controller · Countdown              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Key sampler thread ──▶ InputQueue ──▶ main loop               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use log::{error, info, warn};

use ics_starter::adapters::hardware::HardwareAdapter;
use ics_starter::adapters::log_render::LogRenderer;
use ics_starter::adapters::log_sink::LogEventSink;
use ics_starter::adapters::queue_confirm::QueueConfirm;
use ics_starter::app::ports::IndicatorPort;
use ics_starter::app::service::{AppService, Flow};
use ics_starter::config::ControllerConfig;
use ics_starter::drivers::aux_power::AuxPower;
use ics_starter::drivers::button::{ButtonTiming, Keypad};
use ics_starter::drivers::hw_init;
use ics_starter::drivers::hw_timer::EspTimers;
use ics_starter::drivers::pwm_output::PwmOutput;
use ics_starter::drivers::status_led::StatusLed;
use ics_starter::events::InputQueue;
use ics_starter::timers::TimerShared;

/// Key sampler → main loop.
static INPUT_QUEUE: InputQueue = InputQueue::new();

const KEY_TASK_STACK: usize = 4096;

// ── Key sampler ───────────────────────────────────────────────

fn spawn_key_sampler(
    config: &ControllerConfig,
    running: Arc<AtomicBool>,
) -> Result<thread::JoinHandle<()>> {
    let mut keypad = Keypad::new(ButtonTiming::from_config(config));
    let interval = Duration::from_millis(u64::from(config.key_sample_interval_ms.max(1)));

    let handle = thread::Builder::new()
        .name("keys".into())
        .stack_size(KEY_TASK_STACK)
        .spawn(move || {
            while running.load(Ordering::Acquire) {
                keypad.poll(hw_init::now_ms(), Keypad::is_pressed_hw, |ev| {
                    INPUT_QUEUE.try_enqueue(ev);
                });
                thread::sleep(interval);
            }
        })?;
    Ok(handle)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  ICS Starter v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    if let Err(e) = run() {
        // Bring-up failed before the service owned the outputs.
        error!("start-up failed: {:#}; parking outputs", e);
        hw_init::pwm_stop();
        hw_init::signal_pin_hiz();
    }
    info!("Bye.");
    Ok(())
}

fn run() -> Result<()> {
    let config = ControllerConfig::default();

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;
    let peripherals = Peripherals::take()?;

    let indicator: Arc<dyn IndicatorPort> =
        Arc::new(StatusLed::new(PinDriver::output(peripherals.pins.gpio6)?));
    let shared = Arc::new(TimerShared::new(indicator));

    // ── 3. Adapters ───────────────────────────────────────────
    let timers = EspTimers::new(Arc::clone(&shared))?;
    let mut hw = HardwareAdapter::new(
        PwmOutput::new(config.pwm_duty_percent, config.stop_settle_ms),
        AuxPower::new(PinDriver::output(peripherals.pins.gpio5)?),
        timers,
    );

    let poll = Duration::from_millis(u64::from(config.input_poll_timeout_ms));
    let mut sink = LogEventSink::new();
    let mut render = LogRenderer::new();
    let mut confirm = QueueConfirm::new(&INPUT_QUEUE, poll);

    // ── 4. Key sampler ────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let sampler = spawn_key_sampler(&config, Arc::clone(&running))?;

    // ── 5. App service ────────────────────────────────────────
    let mut app = AppService::new(config, shared);
    app.start(&mut hw, &mut sink);

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    loop {
        let input = INPUT_QUEUE.dequeue_timeout(poll);
        if app.step(input, &mut hw, &mut confirm, &mut render, &mut sink) == Flow::Exit {
            break;
        }
    }

    // ── 7. Teardown ───────────────────────────────────────────
    app.shutdown(&mut hw, &mut sink);
    running.store(false, Ordering::Release);
    if sampler.join().is_err() {
        warn!("key sampler panicked");
    }
    INPUT_QUEUE.clear();
    drop(hw);
    Ok(())
}
