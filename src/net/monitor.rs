//! Connectivity monitor — periodic reachability probing and status
//! pattern selection.
//!
//! Runs independently of the authorization path and only ever affects
//! the status LED. The probe is one bounded TCP connect to a
//! well-known host; its verdict plus the link state maps to a pattern:
//!
//! | Link state | Reachable | Pattern |
//! |------------|-----------|---------|
//! | Down/Connecting | —    | Off     |
//! | Up         | yes       | Solid   |
//! | Up         | no        | Blink (1000 ms half-period) |

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, ReachabilityProbe};
use crate::config::SystemConfig;
use crate::fsm::LinkState;

/// What the status LED should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPattern {
    Off,
    Solid,
    Blink,
}

/// Interval-driven reachability monitor.
pub struct ConnectivityMonitor<P: ReachabilityProbe> {
    probe: P,
    interval_ms: u32,
    elapsed_ms: u32,
    reachable: bool,
    /// Force a probe on the next tick regardless of the interval
    /// (used right after link/session re-establishment).
    probe_pending: bool,
}

impl<P: ReachabilityProbe> ConnectivityMonitor<P> {
    pub fn new(config: &SystemConfig, probe: P) -> Self {
        Self {
            probe,
            interval_ms: config.probe_interval_ms,
            elapsed_ms: 0,
            reachable: false,
            // Probe eagerly on the first tick after boot.
            probe_pending: true,
        }
    }

    /// Latest probe verdict.
    pub fn reachable(&self) -> bool {
        self.reachable
    }

    /// Request an eager probe on the next tick.
    pub fn probe_now(&mut self) {
        self.probe_pending = true;
    }

    /// Advance by `delta_ms`; probes when the interval elapses or an
    /// eager probe is pending. Probing is skipped entirely while the
    /// link is down — the verdict is pinned unreachable.
    pub fn tick(&mut self, delta_ms: u32, link: LinkState, sink: &mut impl EventSink) {
        if link != LinkState::Up {
            self.set_reachable(false, sink);
            return;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        if !self.probe_pending && self.elapsed_ms < self.interval_ms {
            return;
        }

        self.probe_pending = false;
        self.elapsed_ms = 0;
        let verdict = self.probe.probe();
        debug!("reachability probe: {}", if verdict { "ok" } else { "failed" });
        self.set_reachable(verdict, sink);
    }

    /// Pattern for the current connectivity picture.
    pub fn pattern(&self, link: LinkState) -> StatusPattern {
        match link {
            LinkState::Down | LinkState::Connecting => StatusPattern::Off,
            LinkState::Up if self.reachable => StatusPattern::Solid,
            LinkState::Up => StatusPattern::Blink,
        }
    }

    fn set_reachable(&mut self, verdict: bool, sink: &mut impl EventSink) {
        if verdict != self.reachable {
            info!("reachability changed: {}", verdict);
            self.reachable = verdict;
            sink.emit(&AppEvent::ReachabilityChanged(verdict));
        }
    }
}
