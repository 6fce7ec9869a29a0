//! Connectivity status LED driver with pattern playback.
//!
//! A single active-high LED showing the connectivity picture:
//!
//! - **Off** — link down.
//! - **Solid** — link up, internet reachable.
//! - **Blink** — link up, internet unreachable; toggles at a fixed
//!   half-period (1000 ms by default).
//!
//! The main loop calls [`tick`](StatusLed::tick) each control cycle
//! with the elapsed milliseconds; the driver accumulates phase and
//! writes the GPIO only when the level changes.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::net::monitor::StatusPattern;
use crate::pins;

pub struct StatusLed {
    pattern: StatusPattern,
    half_period_ms: u32,
    phase_ms: u32,
    lit: bool,
}

impl StatusLed {
    pub fn new(half_period_ms: u32) -> Self {
        Self {
            pattern: StatusPattern::Off,
            half_period_ms: half_period_ms.max(1),
            phase_ms: 0,
            lit: false,
        }
    }

    /// Select the pattern to play. Changing patterns resets the blink
    /// phase so a fresh Blink always starts lit.
    pub fn set_pattern(&mut self, pattern: StatusPattern) {
        if pattern != self.pattern {
            self.pattern = pattern;
            self.phase_ms = 0;
        }
    }

    /// Advance the pattern phase and drive the output.
    pub fn tick(&mut self, delta_ms: u32) {
        self.phase_ms = self.phase_ms.wrapping_add(delta_ms);

        let lit = match self.pattern {
            StatusPattern::Off => false,
            StatusPattern::Solid => true,
            StatusPattern::Blink => (self.phase_ms / self.half_period_ms) % 2 == 0,
        };

        if lit != self.lit {
            hw_init::gpio_write(pins::STATUS_LED_GPIO, lit);
            self.lit = lit;
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_pattern_stays_dark() {
        let mut led = StatusLed::new(1000);
        for _ in 0..20 {
            led.tick(500);
            assert!(!led.is_lit());
        }
    }

    #[test]
    fn solid_pattern_stays_lit() {
        let mut led = StatusLed::new(1000);
        led.set_pattern(StatusPattern::Solid);
        for _ in 0..20 {
            led.tick(500);
            assert!(led.is_lit());
        }
    }

    #[test]
    fn blink_toggles_at_half_period() {
        let mut led = StatusLed::new(1000);
        led.set_pattern(StatusPattern::Blink);

        led.tick(100);
        assert!(led.is_lit(), "fresh blink starts lit");

        led.tick(1000); // phase 1100 -> second half-period
        assert!(!led.is_lit());

        led.tick(1000); // phase 2100 -> third half-period
        assert!(led.is_lit());
    }

    #[test]
    fn pattern_change_resets_phase() {
        let mut led = StatusLed::new(1000);
        led.set_pattern(StatusPattern::Blink);
        led.tick(1500);
        assert!(!led.is_lit());

        led.set_pattern(StatusPattern::Solid);
        led.tick(1);
        assert!(led.is_lit());

        led.set_pattern(StatusPattern::Blink);
        led.tick(1);
        assert!(led.is_lit(), "re-entering blink starts from the lit phase");
    }

    #[test]
    fn redundant_set_pattern_keeps_phase() {
        let mut led = StatusLed::new(1000);
        led.set_pattern(StatusPattern::Blink);
        led.tick(900);
        led.set_pattern(StatusPattern::Blink);
        led.tick(200); // phase 1100 — would be 200 if reset
        assert!(!led.is_lit());
    }
}
