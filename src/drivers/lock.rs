//! Lock actuator driver.
//!
//! The single trusted action in the system: pulse the lock output
//! active for a fixed duration, then return it to inactive. Blocking —
//! the output is guaranteed inactive again by the time `unlock()`
//! returns, so back-to-back calls can never leave the line stuck high.
//!
//! ## Safety contract
//!
//! Nothing outside [`AccessService`](crate::app::service::AccessService)
//! may call `unlock()`; this driver is a dumb actuator with no policy.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init.
//! On host/test: tracks state in-memory only (hw_init logs).

use std::time::Duration;

use log::info;

use crate::app::ports::LockPort;
use crate::drivers::hw_init;
use crate::pins;

/// Sleep hook — overridable so tests run without the 3 s pulse.
type SleepFn = fn(Duration);

pub struct LockDriver {
    pulse: Duration,
    active: bool,
    sleep: SleepFn,
}

impl LockDriver {
    pub fn new(pulse_ms: u32) -> Self {
        Self {
            pulse: Duration::from_millis(u64::from(pulse_ms)),
            active: false,
            sleep: std::thread::sleep,
        }
    }

    #[cfg(test)]
    fn with_sleep(mut self, sleep: SleepFn) -> Self {
        self.sleep = sleep;
        self
    }

    /// Whether the output line is currently energised.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl LockPort for LockDriver {
    fn unlock(&mut self) {
        info!("lock: pulsing output for {:?}", self.pulse);
        hw_init::gpio_write(pins::LOCK_GPIO, true);
        self.active = true;

        (self.sleep)(self.pulse);

        hw_init::gpio_write(pins::LOCK_GPIO, false);
        self.active = false;
        info!("lock: output released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_sleep(_: Duration) {}

    #[test]
    fn output_inactive_after_pulse() {
        let mut lock = LockDriver::new(3000).with_sleep(no_sleep);
        assert!(!lock.is_active());
        lock.unlock();
        assert!(!lock.is_active(), "pulse must end inactive");
    }

    #[test]
    fn back_to_back_pulses_never_stick_high() {
        let mut lock = LockDriver::new(3000).with_sleep(no_sleep);
        for _ in 0..10 {
            lock.unlock();
            assert!(!lock.is_active());
        }
    }

    #[test]
    fn real_sleep_holds_for_configured_duration() {
        // Tiny pulse with the real sleep to cover the actual hold path.
        let mut lock = LockDriver::new(5);
        let start = std::time::Instant::now();
        lock.unlock();
        assert!(start.elapsed() >= Duration::from_millis(5));
        assert!(!lock.is_active());
    }
}
