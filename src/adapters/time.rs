//! System time adapter.
//!
//! Wall-clock source for attestation timestamps. `std::time::SystemTime`
//! is available on both host targets and ESP-IDF (where it reads the
//! RTC, synced via SNTP during provisioning).

use std::time::{SystemTime, UNIX_EPOCH};

use crate::app::ports::TimePort;

pub struct SystemTimeAdapter;

impl SystemTimeAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemTimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TimePort for SystemTimeAdapter {
    fn epoch_secs(&self) -> i64 {
        // A clock before the epoch would mean a dead RTC battery;
        // attest with 0 rather than panicking mid-confirmation.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_post_epoch_time() {
        let t = SystemTimeAdapter::new();
        // 2020-01-01 — any synced clock is past this.
        assert!(t.epoch_secs() > 1_577_836_800);
    }
}
