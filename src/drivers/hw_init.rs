//! One-shot hardware peripheral initialization and raw pin helpers.
//!
//! Configures the key-pad inputs and parks the signal pin using raw ESP-IDF
//! sys calls.  Called once from `main()` before the event loop starts.  The
//! signal helpers below are used by the output driver at runtime; each has
//! a host no-op twin so the drivers compile and run in tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::Result;
#[cfg(target_os = "espidf")]
use crate::error::Error;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<()> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_key_inputs()?;
    }
    signal_pin_hiz();
    info!("hw_init: keys configured, signal pin parked hi-z");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── Key inputs ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_key_inputs() -> Result<()> {
    for &pin in &pins::KEY_GPIOS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Gpio(ret));
        }
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

// ── Signal pin ────────────────────────────────────────────────

/// Input, no pulls: the inverter sees an open line.
#[cfg(target_os = "espidf")]
pub fn signal_pin_hiz() {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::SIGNAL_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: the signal pin is owned by the output driver; main task only.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        log::error!("hw_init: signal hi-z failed (rc={})", ret);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn signal_pin_hiz() {}

/// Push-pull output driven LOW.
#[cfg(target_os = "espidf")]
pub fn signal_pin_low() {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::SIGNAL_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: see signal_pin_hiz().
    unsafe {
        let ret = gpio_config(&cfg);
        if ret != ESP_OK as i32 {
            log::error!("hw_init: signal low failed (rc={})", ret);
            return;
        }
        gpio_set_level(pins::SIGNAL_GPIO, 0);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn signal_pin_low() {}

// ── LEDC square wave ──────────────────────────────────────────

/// Route the LEDC channel to the signal pin at `freq_hz` / `duty_percent`.
#[cfg(target_os = "espidf")]
pub fn pwm_start(freq_hz: u32, duty_percent: u8) -> Result<()> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: pins::SIGNAL_LEDC_TIMER,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_14_BIT,
        freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: single LEDC user, main task only.
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(Error::Pwm(ret));
    }

    let duty = ((1u32 << pins::PWM_RESOLUTION_BITS) * u32::from(duty_percent.min(100))) / 100;
    let channel = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: pins::SIGNAL_LEDC_CHANNEL,
        timer_sel: pins::SIGNAL_LEDC_TIMER,
        gpio_num: pins::SIGNAL_GPIO,
        duty,
        hpoint: 0,
        ..Default::default()
    };
    let ret = unsafe { ledc_channel_config(&channel) };
    if ret != ESP_OK as i32 {
        return Err(Error::Pwm(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn pwm_start(_freq_hz: u32, _duty_percent: u8) -> Result<()> {
    Ok(())
}

/// Stop the LEDC channel with the output idling LOW.
#[cfg(target_os = "espidf")]
pub fn pwm_stop() {
    // SAFETY: see pwm_start().
    let ret = unsafe { ledc_stop(ledc_mode_t_LEDC_LOW_SPEED_MODE, pins::SIGNAL_LEDC_CHANNEL, 0) };
    if ret != ESP_OK as i32 {
        log::error!("hw_init: ledc_stop failed (rc={})", ret);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn pwm_stop() {}

#[cfg(target_os = "espidf")]
pub fn settle_delay_ms(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
pub fn settle_delay_ms(_ms: u32) {}

/// Milliseconds since boot, truncated to u32.
#[cfg(target_os = "espidf")]
pub fn now_ms() -> u32 {
    // SAFETY: esp_timer_get_time is a monotonic counter read.
    (unsafe { esp_timer_get_time() } / 1_000) as u32
}
