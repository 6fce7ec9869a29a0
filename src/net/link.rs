//! Link manager — wraps the link FSM with the platform port and the
//! retry/restart policy.
//!
//! The FSM decides *what* should happen (attempt a connect, escalate
//! to restart); this manager performs it: one blocking association
//! attempt per service call, a fixed backoff sleep after each failure,
//! and the actual [`RestartPort`] invocation when the link is deemed
//! unrecoverable.
//!
//! It also owns the session-layer reconnect policy: whenever the link
//! is Up and the pub/sub session is down, one (re)connect attempt per
//! [`service_session`](LinkManager::service_session) call, with a
//! fixed delay after each failure. Session loss alone never escalates
//! to restart.

use std::time::Duration;

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, LinkPort, RestartPort, SessionPort};
use crate::config::SystemConfig;
use crate::fsm::context::LinkContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, LinkState};

/// Sleep hook — overridable so tests run without real delays.
type SleepFn = fn(Duration);

pub struct LinkManager<L: LinkPort, R: RestartPort> {
    fsm: Fsm,
    ctx: LinkContext,
    link: L,
    restart: R,
    retry_backoff: Duration,
    session_retry_delay: Duration,
    sleep: SleepFn,
}

impl<L: LinkPort, R: RestartPort> LinkManager<L, R> {
    pub fn new(config: &SystemConfig, link: L, restart: R) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), LinkState::Down),
            ctx: LinkContext::new(config.link_max_attempts),
            link,
            restart,
            retry_backoff: Duration::from_millis(u64::from(config.link_retry_backoff_ms)),
            session_retry_delay: Duration::from_millis(u64::from(config.session_retry_delay_ms)),
            sleep: std::thread::sleep,
        }
    }

    /// Replace the backoff sleep (simulation and tests — keeps suites
    /// fast; production uses the real thread sleep).
    pub fn with_sleep(mut self, sleep: SleepFn) -> Self {
        self.sleep = sleep;
        self
    }

    /// Run the initial state's entry action.
    pub fn start(&mut self) {
        self.fsm.start(&mut self.ctx);
    }

    pub fn state(&self) -> LinkState {
        self.fsm.current_state()
    }

    pub fn is_up(&self) -> bool {
        self.fsm.current_state() == LinkState::Up
    }

    /// One link service tick: observe the platform, advance the FSM,
    /// and perform whatever the handlers requested.
    pub fn service(&mut self, sink: &mut impl EventSink) -> LinkState {
        self.ctx.observed.associated = self.link.is_associated();
        self.ctx.observed.has_address = self.link.has_address();

        let prev = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);

        if self.ctx.connect_requested {
            self.ctx.connect_requested = false;
            match self.link.connect() {
                Ok(()) => {
                    self.ctx.attempt_result = Some(true);
                }
                Err(e) => {
                    warn!(
                        "link attempt {} failed: {e}",
                        self.ctx.consecutive_failures + 1
                    );
                    self.ctx.attempt_result = Some(false);
                    (self.sleep)(self.retry_backoff);
                }
            }
        }

        if self.ctx.restart_requested {
            self.ctx.restart_requested = false;
            error!("link unrecoverable — performing full restart");
            self.restart.restart();
        }

        let now = self.fsm.current_state();
        if now != prev {
            sink.emit(&AppEvent::LinkChanged { from: prev, to: now });
        }
        now
    }

    /// One session service tick. Returns `true` iff the session was
    /// newly established this call (the caller should probe
    /// reachability eagerly).
    pub fn service_session(
        &mut self,
        session: &mut impl SessionPort,
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.is_up() {
            if session.is_connected() {
                warn!("link is down — dropping session");
                session.disconnect();
            }
            return false;
        }

        if session.is_connected() {
            return false;
        }

        match session.connect() {
            Ok(()) => {
                info!("session established and subscribed");
                sink.emit(&AppEvent::SessionEstablished);
                true
            }
            Err(e) => {
                // Unbounded retries; session loss alone is not fatal.
                warn!("session connect failed: {e} — retrying after delay");
                (self.sleep)(self.session_retry_delay);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::{LinkError, SessionError};

    fn no_sleep(_: Duration) {}

    // ── Mock ports ────────────────────────────────────────────

    struct ScriptedLink {
        /// Outcome script for successive connect() calls; when
        /// exhausted, attempts fail.
        script: Vec<bool>,
        next: usize,
        associated: bool,
        addressed: bool,
    }
    impl ScriptedLink {
        fn failing() -> Self {
            Self {
                script: Vec::new(),
                next: 0,
                associated: false,
                addressed: false,
            }
        }
        fn succeeding_after(failures: usize) -> Self {
            let mut script = vec![false; failures];
            script.push(true);
            Self {
                script,
                next: 0,
                associated: false,
                addressed: false,
            }
        }
    }
    impl LinkPort for ScriptedLink {
        fn connect(&mut self) -> Result<(), LinkError> {
            let ok = self.script.get(self.next).copied().unwrap_or(false);
            self.next += 1;
            if ok {
                self.associated = true;
                self.addressed = true;
                Ok(())
            } else {
                Err(LinkError::ConnectFailed)
            }
        }
        fn disconnect(&mut self) {
            self.associated = false;
            self.addressed = false;
        }
        fn is_associated(&self) -> bool {
            self.associated
        }
        fn has_address(&self) -> bool {
            self.addressed
        }
    }

    #[derive(Default)]
    struct CountingRestart {
        restarts: u32,
    }
    impl RestartPort for CountingRestart {
        fn restart(&mut self) {
            self.restarts += 1;
        }
    }

    #[derive(Default)]
    struct NullSink;
    impl crate::app::ports::EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    struct ScriptedSession {
        connected: bool,
        accept_connect: bool,
        connects: u32,
        disconnects: u32,
    }
    impl ScriptedSession {
        fn new(accept_connect: bool) -> Self {
            Self {
                connected: false,
                accept_connect,
                connects: 0,
                disconnects: 0,
            }
        }
    }
    impl SessionPort for ScriptedSession {
        fn connect(&mut self) -> Result<(), SessionError> {
            self.connects += 1;
            if self.accept_connect {
                self.connected = true;
                Ok(())
            } else {
                Err(SessionError::ConnectFailed)
            }
        }
        fn disconnect(&mut self) {
            self.connected = false;
            self.disconnects += 1;
        }
        fn is_connected(&self) -> bool {
            self.connected
        }
        fn poll(&mut self, _on_message: &mut dyn FnMut(&str, &[u8])) {}
    }

    fn manager(link: ScriptedLink) -> LinkManager<ScriptedLink, CountingRestart> {
        let config = SystemConfig::default();
        LinkManager::new(&config, link, CountingRestart::default()).with_sleep(no_sleep)
    }

    // ── Tests ─────────────────────────────────────────────────

    #[test]
    fn comes_up_after_transient_failures() {
        let mut mgr = manager(ScriptedLink::succeeding_after(3));
        let mut sink = NullSink;
        mgr.start();

        for _ in 0..10 {
            mgr.service(&mut sink);
        }
        assert_eq!(mgr.state(), LinkState::Up);
        assert_eq!(mgr.restart.restarts, 0);
    }

    #[test]
    fn twenty_failures_trigger_exactly_one_restart() {
        // Scenario E: persistent link loss escalates to restart, never
        // a silent hang.
        let mut mgr = manager(ScriptedLink::failing());
        let mut sink = NullSink;
        mgr.start();

        // Down -> Connecting takes one tick, then one attempt per tick.
        for _ in 0..=21 {
            mgr.service(&mut sink);
        }
        assert_eq!(mgr.restart.restarts, 1);
    }

    #[test]
    fn link_loss_sends_up_back_to_down_then_reconnects() {
        let mut mgr = manager(ScriptedLink::succeeding_after(0));
        let mut sink = NullSink;
        mgr.start();

        for _ in 0..3 {
            mgr.service(&mut sink);
        }
        assert_eq!(mgr.state(), LinkState::Up);

        // Platform drops the address (captive-portal style sentinel).
        mgr.link.addressed = false;
        mgr.service(&mut sink);
        assert_eq!(mgr.state(), LinkState::Down);

        mgr.service(&mut sink); // Down -> Connecting, attempt fails (script spent)
        assert_eq!(mgr.state(), LinkState::Connecting);
    }

    #[test]
    fn session_connects_only_when_link_up() {
        let mut mgr = manager(ScriptedLink::succeeding_after(0));
        let mut session = ScriptedSession::new(true);
        let mut sink = NullSink;
        mgr.start();

        assert!(!mgr.service_session(&mut session, &mut sink));
        assert_eq!(session.connects, 0, "no session attempt while link down");

        for _ in 0..3 {
            mgr.service(&mut sink);
        }
        assert!(mgr.is_up());

        assert!(mgr.service_session(&mut session, &mut sink), "fresh establishment reported");
        assert!(session.is_connected());
        assert!(!mgr.service_session(&mut session, &mut sink), "already connected: no-op");
        assert_eq!(session.connects, 1);
    }

    #[test]
    fn session_failures_retry_without_restart() {
        let mut mgr = manager(ScriptedLink::succeeding_after(0));
        let mut session = ScriptedSession::new(false);
        let mut sink = NullSink;
        mgr.start();
        for _ in 0..3 {
            mgr.service(&mut sink);
        }

        for _ in 0..50 {
            assert!(!mgr.service_session(&mut session, &mut sink));
        }
        assert_eq!(session.connects, 50, "unbounded session retries");
        assert_eq!(mgr.restart.restarts, 0, "session loss alone never restarts");
    }

    #[test]
    fn session_dropped_when_link_falls() {
        let mut mgr = manager(ScriptedLink::succeeding_after(0));
        let mut session = ScriptedSession::new(true);
        let mut sink = NullSink;
        mgr.start();
        for _ in 0..3 {
            mgr.service(&mut sink);
        }
        mgr.service_session(&mut session, &mut sink);
        assert!(session.is_connected());

        mgr.link.associated = false;
        mgr.link.addressed = false;
        mgr.service(&mut sink);
        assert_eq!(mgr.state(), LinkState::Down);

        mgr.service_session(&mut session, &mut sink);
        assert!(!session.is_connected());
        assert_eq!(session.disconnects, 1);
    }
}
