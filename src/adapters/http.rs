//! Backend confirmation adapter — blocking HTTP POST.
//!
//! Implements [`ConfirmationPort`]: submit the signed attestation as
//! JSON to the fixed confirmation endpoint and map the result.
//! Exactly HTTP 200 is approval; every other status, timeout, or
//! transport failure is denial. No retries — the issuing side owns
//! command redelivery.

use std::time::Duration;

use log::warn;

use crate::app::ports::{ConfirmationOutcome, ConfirmationPort};
use crate::auth::attestation::ConfirmationAttestation;
use crate::config::SystemConfig;

pub struct HttpConfirmation {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpConfirmation {
    pub fn new(config: &SystemConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(u64::from(config.http_timeout_ms)))
            .build()?;
        Ok(Self {
            url: config.confirmation_url(),
            client,
        })
    }
}

impl ConfirmationPort for HttpConfirmation {
    fn submit(&mut self, attestation: &ConfirmationAttestation) -> ConfirmationOutcome {
        match self.client.post(&self.url).json(attestation).send() {
            Ok(response) => {
                let status = response.status().as_u16();
                // The body is never interpreted; the status code alone
                // decides.
                if status == 200 {
                    ConfirmationOutcome::Approved
                } else {
                    ConfirmationOutcome::Denied(status)
                }
            }
            Err(e) => {
                warn!("confirmation POST failed: {e}");
                ConfirmationOutcome::Unreachable
            }
        }
    }
}
