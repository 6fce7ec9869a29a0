//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AccessService / LinkManager (domain)
//! ```
//!
//! Driven adapters (network link, pub/sub session, backend HTTP, lock
//! output, clock) implement these traits. The domain consumes them via
//! generics, so the core never touches sockets or GPIO directly.
//!
//! ## Security notes
//!
//! - **ConfirmationPort** implementations MUST NOT interpret response
//!   bodies — only the exact status code 200 is approval.
//! - **LockPort** is the single trusted action; nothing else may drive
//!   the lock output.

use core::fmt;

use crate::auth::attestation::ConfirmationAttestation;

// ───────────────────────────────────────────────────────────────
// Network link port (driven adapter: platform radio/NIC → domain)
// ───────────────────────────────────────────────────────────────

/// The raw network link (WiFi association on the device).
pub trait LinkPort {
    /// One blocking association attempt.
    fn connect(&mut self) -> Result<(), LinkError>;

    /// Tear the link down.
    fn disconnect(&mut self);

    /// Whether the platform reports the link as associated.
    fn is_associated(&self) -> bool;

    /// Whether the link holds a usable (non-sentinel) address.
    /// An associated link with address 0.0.0.0 counts as lost.
    fn has_address(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectFailed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no link credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectFailed => write!(f, "link association failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Pub/sub session port (driven adapter: broker session → domain)
// ───────────────────────────────────────────────────────────────

/// The publish/subscribe session layered on the link. A successful
/// `connect` leaves the session subscribed to the command topic.
pub trait SessionPort {
    /// Establish the session and subscribe to the command topic.
    fn connect(&mut self) -> Result<(), SessionError>;

    /// Drop the session.
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// Drain pending inbound publishes, invoking `on_message(topic,
    /// payload)` for each, in delivery order. Connection loss observed
    /// here flips `is_connected` to false.
    fn poll(&mut self, on_message: &mut dyn FnMut(&str, &[u8]));
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    ConnectFailed,
    SubscribeFailed,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "session connect failed"),
            Self::SubscribeFailed => write!(f, "command topic subscribe failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Confirmation port (driven adapter: domain → backend HTTP)
// ───────────────────────────────────────────────────────────────

/// Outcome of submitting an attestation to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Exactly HTTP 200.
    Approved,
    /// Any other HTTP status.
    Denied(u16),
    /// Timeout or transport failure — treated as denial.
    Unreachable,
}

/// Submits a signed attestation and reports the backend's decision.
/// No retry at this layer.
pub trait ConfirmationPort {
    fn submit(&mut self, attestation: &ConfirmationAttestation) -> ConfirmationOutcome;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → lock output)
// ───────────────────────────────────────────────────────────────

/// The minimal trusted action: pulse the lock output. Blocking; the
/// output is inactive again by the time the call returns.
pub trait LockPort {
    fn unlock(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Reachability probe port (driven adapter: domain → external host)
// ───────────────────────────────────────────────────────────────

/// One bounded-timeout connect attempt to the well-known probe host.
/// True iff the connect succeeded; the socket is closed immediately,
/// no data exchanged.
pub trait ReachabilityProbe {
    fn probe(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Restart port (fail-fast escalation)
// ───────────────────────────────────────────────────────────────

/// Full process restart. Invoked only when the link is deemed
/// unrecoverable; implementations on real hardware do not return.
pub trait RestartPort {
    fn restart(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: wall clock → domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock time source for attestation timestamps.
pub trait TimePort {
    /// Seconds since the Unix epoch.
    fn epoch_secs(&self) -> i64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log,
/// telemetry uplink, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
