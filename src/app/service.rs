//! Access authorization service — the hexagonal core.
//!
//! [`AccessService`] owns the verify → confirm → actuate pipeline. All
//! I/O flows through port traits injected at call sites, making the
//! entire flow testable with mock adapters.
//!
//! ```text
//!  SessionPort ──▶ ┌──────────────────────────┐ ──▶ ConfirmationPort
//!  (raw payload)   │      AccessService        │ ──▶ LockPort
//!                  │  verify · attest · gate   │ ──▶ EventSink
//!                  └──────────────────────────┘
//! ```
//!
//! Fail-closed by construction: every failure path returns before the
//! lock port is touched. The flow is strictly single-flight — one
//! command is fully resolved before the next is examined.

use log::{info, warn};

use crate::auth::attestation::AttestationSigner;
use crate::auth::keys::KeyMaterial;
use crate::auth::verifier::CommandVerifier;

use super::events::AppEvent;
use super::ports::{ConfirmationOutcome, ConfirmationPort, EventSink, LockPort, TimePort};

/// The only command that may actuate the lock.
const OPEN_COMMAND: &str = "open";

// ───────────────────────────────────────────────────────────────
// Access flow state
// ───────────────────────────────────────────────────────────────

/// Where the single-flight authorization pipeline currently is.
/// Purely sequential — the state is Idle again by the time
/// [`AccessService::handle_message`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessFlow {
    Idle,
    Verifying,
    Confirming,
}

// ───────────────────────────────────────────────────────────────
// AccessService
// ───────────────────────────────────────────────────────────────

/// Orchestrates command verification and backend confirmation.
pub struct AccessService<'a> {
    verifier: CommandVerifier<'a>,
    signer: AttestationSigner<'a>,
    flow: AccessFlow,
}

impl<'a> AccessService<'a> {
    pub fn new(keys: &'a KeyMaterial) -> Self {
        Self {
            verifier: CommandVerifier::new(keys),
            signer: AttestationSigner::new(keys),
            flow: AccessFlow::Idle,
        }
    }

    /// Current pipeline position (observable for diagnostics only).
    pub fn flow(&self) -> AccessFlow {
        self.flow
    }

    /// Process one raw payload from the command topic.
    ///
    /// Returns `true` iff the lock actually fired. Every other outcome
    /// — unparseable payload, bad signature, non-"open" command, empty
    /// command id, signing failure, backend denial — returns `false`
    /// with no actuation.
    pub fn handle_message(
        &mut self,
        topic: &str,
        payload: &[u8],
        confirm: &mut impl ConfirmationPort,
        lock: &mut impl LockPort,
        time: &impl TimePort,
        sink: &mut impl EventSink,
    ) -> bool {
        self.flow = AccessFlow::Verifying;
        let actuated = self.run_pipeline(topic, payload, confirm, lock, time, sink);
        self.flow = AccessFlow::Idle;
        actuated
    }

    fn run_pipeline(
        &mut self,
        topic: &str,
        payload: &[u8],
        confirm: &mut impl ConfirmationPort,
        lock: &mut impl LockPort,
        time: &impl TimePort,
        sink: &mut impl EventSink,
    ) -> bool {
        let Some(cmd) = self.verifier.verify(payload) else {
            // Malformed or unauthenticated traffic is normal operation.
            sink.emit(&AppEvent::CommandRejected);
            return false;
        };

        sink.emit(&AppEvent::CommandVerified {
            command: cmd.command.clone(),
            command_id: cmd.command_id.clone(),
        });

        if cmd.command != OPEN_COMMAND || cmd.command_id.is_empty() {
            info!(
                "verified command {:?} on {topic} takes no action",
                cmd.command
            );
            return false;
        }

        self.flow = AccessFlow::Confirming;
        self.confirm_and_unlock(&cmd.command_id, confirm, lock, time, sink)
    }

    /// Second-factor confirmation: sign an attestation, submit it, and
    /// fire the lock iff the backend approves.
    pub fn confirm_and_unlock(
        &mut self,
        command_id: &str,
        confirm: &mut impl ConfirmationPort,
        lock: &mut impl LockPort,
        time: &impl TimePort,
        sink: &mut impl EventSink,
    ) -> bool {
        let timestamp = time.epoch_secs();

        let attestation = match self.signer.sign(command_id, timestamp) {
            Ok(a) => a,
            Err(e) => {
                // Never contact the backend with a partially built
                // attestation.
                warn!("confirmation aborted before submit: {e}");
                sink.emit(&AppEvent::AccessDenied {
                    command_id: command_id.to_owned(),
                });
                return false;
            }
        };

        match confirm.submit(&attestation) {
            ConfirmationOutcome::Approved => {
                info!("backend approved command {command_id} — unlocking");
                sink.emit(&AppEvent::AccessGranted {
                    command_id: command_id.to_owned(),
                });
                lock.unlock();
                true
            }
            ConfirmationOutcome::Denied(status) => {
                info!("backend denied command {command_id} (HTTP {status})");
                sink.emit(&AppEvent::AccessDenied {
                    command_id: command_id.to_owned(),
                });
                false
            }
            ConfirmationOutcome::Unreachable => {
                warn!("backend unreachable for command {command_id} — denying");
                sink.emit(&AppEvent::AccessDenied {
                    command_id: command_id.to_owned(),
                });
                false
            }
        }
    }
}
