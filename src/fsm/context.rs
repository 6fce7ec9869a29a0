//! Shared mutable context threaded through every link-FSM handler.
//!
//! `LinkContext` is the blackboard the state handlers read from and
//! write to: the platform's observed link status (written by the link
//! manager before each tick), the result of the last connect attempt,
//! retry accounting, and the requests the handlers leave behind for
//! the link manager to act on.

// ---------------------------------------------------------------------------
// Observed platform status (read-only to state handlers)
// ---------------------------------------------------------------------------

/// Point-in-time snapshot of what the platform reports about the link.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkObservation {
    /// Platform reports the link as associated.
    pub associated: bool,
    /// The link holds a non-sentinel address (not 0.0.0.0).
    pub has_address: bool,
}

impl LinkObservation {
    /// Usable link: associated AND addressed.
    pub fn alive(&self) -> bool {
        self.associated && self.has_address
    }
}

// ---------------------------------------------------------------------------
// LinkContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct LinkContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,

    // -- Observed status --
    /// Latest platform snapshot. Updated before each FSM tick.
    pub observed: LinkObservation,

    // -- Attempt plumbing --
    /// Result of the last connect attempt, if one completed since the
    /// previous tick. Consumed (taken) by the Connecting handler.
    pub attempt_result: Option<bool>,
    /// Set by handlers to ask the link manager for one connect attempt.
    pub connect_requested: bool,

    // -- Retry accounting --
    /// Failed attempts since the last success.
    pub consecutive_failures: u32,
    /// Failures tolerated before escalating to restart.
    pub max_attempts: u32,
    /// Set when the link is deemed unrecoverable; the link manager
    /// performs the actual restart.
    pub restart_requested: bool,
}

impl LinkContext {
    /// Create a new context with the given restart threshold.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            ticks_in_state: 0,
            observed: LinkObservation::default(),
            attempt_result: None,
            connect_requested: false,
            consecutive_failures: 0,
            max_attempts,
            restart_requested: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_alive_requires_both() {
        let mut obs = LinkObservation::default();
        assert!(!obs.alive());
        obs.associated = true;
        assert!(!obs.alive(), "address sentinel keeps the link dead");
        obs.has_address = true;
        assert!(obs.alive());
    }

    #[test]
    fn new_context_is_quiescent() {
        let ctx = LinkContext::new(20);
        assert_eq!(ctx.consecutive_failures, 0);
        assert!(!ctx.connect_requested);
        assert!(!ctx.restart_requested);
        assert!(ctx.attempt_result.is_none());
    }
}
