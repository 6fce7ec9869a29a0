//! Confirmation attestations.
//!
//! Before the lock may fire, the device attests to the backend that it
//! verified a specific command. The attestation is a detached
//! RSA/SHA-256 signature over `"confirmed:" + commandId + ":" +
//! timestamp`, where the timestamp is the attestation time (distinct
//! from the inbound command's timestamp). Built, signed, submitted,
//! and discarded per attempt — never persisted.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use rsa::Pkcs1v15Sign;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::KeyError;

use super::confirmation_canonical;
use super::keys::KeyMaterial;

/// The POST body submitted to the confirmation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationAttestation {
    #[serde(rename = "commandId")]
    pub command_id: String,
    /// Attestation time, seconds since epoch.
    pub timestamp: i64,
    /// Base64 detached signature over the canonical string.
    pub signature: String,
}

/// Signs confirmation attestations with the device private key.
pub struct AttestationSigner<'a> {
    keys: &'a KeyMaterial,
}

impl<'a> AttestationSigner<'a> {
    pub fn new(keys: &'a KeyMaterial) -> Self {
        Self { keys }
    }

    /// Build and sign an attestation. Any signing failure aborts the
    /// confirmation attempt; the backend is never contacted with an
    /// unsigned or partially built attestation.
    pub fn sign(
        &self,
        command_id: &str,
        timestamp: i64,
    ) -> Result<ConfirmationAttestation, KeyError> {
        let canonical = confirmation_canonical(command_id, timestamp);
        let digest = Sha256::digest(canonical.as_bytes());

        let sig = self
            .keys
            .signing_key()
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|_| KeyError::SigningFailed)?;

        Ok(ConfirmationAttestation {
            command_id: command_id.to_owned(),
            timestamp,
            signature: B64.encode(sig),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testkeys;

    #[test]
    fn attestation_signature_verifies_over_canonical_string() {
        let keys = testkeys::material();
        let signer = AttestationSigner::new(&keys);

        let att = signer.sign("abc", 1_700_000_000).unwrap();
        assert_eq!(att.command_id, "abc");
        assert_eq!(att.timestamp, 1_700_000_000);

        let sig = B64.decode(att.signature.as_bytes()).unwrap();
        let digest = Sha256::digest(confirmation_canonical("abc", 1_700_000_000).as_bytes());
        keys.verify_key()
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &sig)
            .expect("attestation verifies with the device public key");
    }

    #[test]
    fn attestation_does_not_verify_for_other_command_id() {
        let keys = testkeys::material();
        let signer = AttestationSigner::new(&keys);

        let att = signer.sign("abc", 1000).unwrap();
        let sig = B64.decode(att.signature.as_bytes()).unwrap();
        let digest = Sha256::digest(confirmation_canonical("xyz", 1000).as_bytes());
        assert!(keys
            .verify_key()
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &sig)
            .is_err());
    }

    #[test]
    fn signing_is_deterministic() {
        // PKCS#1 v1.5 signing uses no randomness; identical inputs must
        // produce identical attestations.
        let keys = testkeys::material();
        let signer = AttestationSigner::new(&keys);
        let a = signer.sign("abc", 42).unwrap();
        let b = signer.sign("abc", 42).unwrap();
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let keys = testkeys::material();
        let att = AttestationSigner::new(&keys).sign("abc", 7).unwrap();
        let json = serde_json::to_value(&att).unwrap();
        assert!(json.get("commandId").is_some());
        assert!(json.get("timestamp").is_some());
        assert!(json.get("signature").is_some());
        assert!(json.get("command_id").is_none());
    }
}
