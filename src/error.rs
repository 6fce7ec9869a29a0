#![allow(dead_code)] // Comms/Actuator variants reserved for typed port returns

//! Unified error types for the Gatewise controller.
//!
//! A single `Error` enum every subsystem converts into, keeping the
//! top-level control loop's error handling uniform. Expected-negative
//! outcomes (malformed payloads, failed signature checks, backend
//! denials) are NOT errors — they are `Option`/`bool` results; only
//! genuinely exceptional conditions appear here.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Key material could not be loaded or used.
    Key(KeyError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Key(e) => write!(f, "key: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommsError {
    /// The network link could not be established.
    LinkConnectFailed,
    /// The link dropped after being up.
    LinkLost,
    /// The pub/sub session could not be established.
    SessionConnectFailed,
    /// Subscribing to the command topic failed.
    SubscribeFailed,
    /// The confirmation request could not be delivered.
    BackendUnreachable,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkConnectFailed => write!(f, "link connect failed"),
            Self::LinkLost => write!(f, "link lost"),
            Self::SessionConnectFailed => write!(f, "session connect failed"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
            Self::BackendUnreachable => write!(f, "backend unreachable"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Key material errors
// ---------------------------------------------------------------------------

/// Failures loading or applying the device keypair. Any of these during
/// a confirmation attempt aborts the attempt without actuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The public-key PEM could not be parsed.
    PublicKeyParse,
    /// The private-key PEM could not be parsed.
    PrivateKeyParse,
    /// Producing a signature failed.
    SigningFailed,
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PublicKeyParse => write!(f, "public key PEM parse failed"),
            Self::PrivateKeyParse => write!(f, "private key PEM parse failed"),
            Self::SigningFailed => write!(f, "signing failed"),
        }
    }
}

impl From<KeyError> for Error {
    fn from(e: KeyError) -> Self {
        Self::Key(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO write failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
