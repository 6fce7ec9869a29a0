//! Outbound application events.
//!
//! The domain emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, forward to a
//! telemetry uplink, record in tests.

use crate::fsm::LinkState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The controller finished bootstrapping.
    Started,

    /// The link FSM transitioned between states.
    LinkChanged { from: LinkState, to: LinkState },

    /// The pub/sub session was (re-)established and subscribed.
    SessionEstablished,

    /// The reachability probe's verdict changed.
    ReachabilityChanged(bool),

    /// An inbound payload failed parsing or signature verification.
    CommandRejected,

    /// An inbound command passed signature verification.
    CommandVerified { command: String, command_id: String },

    /// The backend approved a confirmation; the lock fired.
    AccessGranted { command_id: String },

    /// The backend denied (or was unreachable for) a confirmation.
    AccessDenied { command_id: String },
}
