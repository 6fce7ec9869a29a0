//! One-shot hardware peripheral initialization and raw GPIO shims.
//!
//! Configures the two output pins (lock, status LED) using raw ESP-IDF
//! sys calls. Called once from `main()` before the control loop starts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real `gpio_*` sys calls.
//! On host/test: no-ops with trace logging.

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

// ── Init ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn init_outputs() -> Result<(), HwInitError> {
    // SAFETY: called once from main() before the control loop;
    // single-threaded.
    unsafe {
        for pin in [pins::LOCK_GPIO, pins::STATUS_LED_GPIO] {
            let ret = gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
            if ret != ESP_OK {
                return Err(HwInitError::GpioConfigFailed(ret));
            }
            let ret = gpio_set_level(pin, 0);
            if ret != ESP_OK {
                return Err(HwInitError::GpioConfigFailed(ret));
            }
        }
    }
    log::info!("hw_init: lock + status LED outputs configured low");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_outputs() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO write ────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: pin was configured as output in init_outputs(); writes
    // happen only from the single control thread.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    log::trace!("gpio(sim): pin {} -> {}", pin, u8::from(high));
}
