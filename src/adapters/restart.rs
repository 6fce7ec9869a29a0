//! Process restart adapter — the fail-fast escape hatch.
//!
//! Invoked by the link manager when the link is unrecoverable. On the
//! device this is a chip reset; on host targets the process exits
//! non-zero and the supervisor (systemd unit, container runtime)
//! performs the fresh boot.

use log::error;

use crate::app::ports::RestartPort;

pub struct ProcessRestart;

impl RestartPort for ProcessRestart {
    #[cfg(target_os = "espidf")]
    fn restart(&mut self) {
        error!("restarting device");
        unsafe {
            esp_idf_sys::esp_restart();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn restart(&mut self) {
        error!("exiting for supervisor restart");
        std::process::exit(1);
    }
}
