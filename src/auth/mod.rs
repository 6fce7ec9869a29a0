//! Command authentication and confirmation attestations.
//!
//! Both sides of the device's trust relationship live here:
//!
//! - [`verifier`] checks inbound commands against the issuer's public
//!   key before anything downstream may trust them.
//! - [`attestation`] signs the outbound confirmation the backend
//!   demands before an unlock is approved.
//!
//! The canonical strings are the exact byte sequences hashed and
//! signed; issuer, device, and backend must reproduce them
//! byte-for-byte.

pub mod attestation;
pub mod keys;
pub mod verifier;

/// Decoded signatures larger than this are rejected outright.
/// Sized for RSA-2048 (256-byte signatures).
pub const MAX_SIGNATURE_LEN: usize = 256;

/// Canonical form of an inbound command: `command + ":" + timestamp`.
pub fn command_canonical(command: &str, timestamp: i64) -> String {
    format!("{command}:{timestamp}")
}

/// Canonical form of a confirmation attestation:
/// `"confirmed:" + commandId + ":" + timestamp`.
pub fn confirmation_canonical(command_id: &str, timestamp: i64) -> String {
    format!("confirmed:{command_id}:{timestamp}")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_canonical_matches_wire_format() {
        assert_eq!(command_canonical("open", 1000), "open:1000");
        assert_eq!(command_canonical("status", 0), "status:0");
    }

    #[test]
    fn confirmation_canonical_matches_wire_format() {
        assert_eq!(confirmation_canonical("abc", 1700000000), "confirmed:abc:1700000000");
    }

    #[test]
    fn canonical_strings_are_domain_separated() {
        // A command signature must never verify as a confirmation and
        // vice versa; the "confirmed:" prefix separates the domains.
        assert_ne!(command_canonical("abc", 7), confirmation_canonical("abc", 7));
    }
}
