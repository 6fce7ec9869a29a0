//! Fuzz the command verifier: arbitrary broker payloads must never
//! panic, and must never verify (the fuzzer cannot forge RSA).

#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;

use gatewise::auth::keys::KeyMaterial;
use gatewise::auth::verifier::CommandVerifier;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;

static KEYS: OnceLock<KeyMaterial> = OnceLock::new();

fn keys() -> &'static KeyMaterial {
    KEYS.get_or_init(|| {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, 2048).expect("fuzz keygen");
        let public_pem = private
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();
        let private_pem = private.to_pkcs1_pem(LineEnding::LF).unwrap().to_string();
        KeyMaterial::from_pems(&public_pem, &private_pem).unwrap()
    })
}

fuzz_target!(|data: &[u8]| {
    let verifier = CommandVerifier::new(keys());
    assert!(verifier.verify(data).is_none());
});
