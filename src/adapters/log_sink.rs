//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC on the device, stderr on host). A future
//! telemetry uplink adapter would implement the same trait.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | controller ready");
            }
            AppEvent::LinkChanged { from, to } => {
                info!("LINK  | {:?} -> {:?}", from, to);
            }
            AppEvent::SessionEstablished => {
                info!("SESS  | connected and subscribed");
            }
            AppEvent::ReachabilityChanged(reachable) => {
                info!("REACH | internet {}", if *reachable { "reachable" } else { "unreachable" });
            }
            AppEvent::CommandRejected => {
                // Unauthenticated traffic is expected; keep it quiet.
                debug!("CMD   | rejected");
            }
            AppEvent::CommandVerified { command, command_id } => {
                info!("CMD   | verified '{}' id={}", command, command_id);
            }
            AppEvent::AccessGranted { command_id } => {
                info!("ACCESS| granted id={}", command_id);
            }
            AppEvent::AccessDenied { command_id } => {
                warn!("ACCESS| denied id={}", command_id);
            }
        }
    }
}
