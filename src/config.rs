//! System configuration parameters
//!
//! All tunable parameters for the Gatewise controller. Values can be
//! overridden by a JSON config file supplied at startup; defaults match
//! the shipped hardware.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- MQTT session ---
    /// Broker hostname or IP.
    pub mqtt_broker: String,
    /// Broker port.
    pub mqtt_port: u16,
    /// Client identifier presented to the broker.
    pub mqtt_client_id: String,
    /// The single command topic the device subscribes to.
    pub command_topic: String,
    /// Fixed delay between session (re)connect attempts (milliseconds).
    pub session_retry_delay_ms: u32,
    /// How long a session connect attempt may block waiting for ConnAck.
    pub session_connect_timeout_ms: u32,

    // --- Backend confirmation ---
    /// Base URL of the confirmation backend (no trailing slash).
    pub backend_base_url: String,
    /// HTTP request timeout (milliseconds).
    pub http_timeout_ms: u32,

    // --- Link ---
    /// Fixed backoff between link connect attempts (milliseconds).
    pub link_retry_backoff_ms: u32,
    /// Consecutive link failures before the device restarts itself.
    pub link_max_attempts: u32,

    // --- Reachability probe ---
    /// Well-known host probed to decide "internet reachable".
    pub probe_host: String,
    /// Probe port.
    pub probe_port: u16,
    /// Probe interval (milliseconds).
    pub probe_interval_ms: u32,
    /// TCP connect timeout for a single probe (milliseconds).
    pub probe_timeout_ms: u32,

    // --- Status LED ---
    /// Half-period of the "link up, internet unreachable" blink (milliseconds).
    pub blink_half_period_ms: u32,

    // --- Actuator ---
    /// Duration the lock output is held active per unlock (milliseconds).
    pub unlock_pulse_ms: u32,

    // --- Key material ---
    /// PEM file with the public key used to verify inbound commands.
    pub public_key_path: String,
    /// PEM file with the private key used to sign outbound attestations.
    pub private_key_path: String,

    // --- Timing ---
    /// Control loop interval (milliseconds).
    pub control_loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // MQTT
            mqtt_broker: "mqtt.gatewise.local".to_string(),
            mqtt_port: 1883,
            mqtt_client_id: "gatewise-lock".to_string(),
            command_topic: "command/open-lock".to_string(),
            session_retry_delay_ms: 2000,
            session_connect_timeout_ms: 5000,

            // Backend
            backend_base_url: "https://backend.gatewise.local".to_string(),
            http_timeout_ms: 10_000,

            // Link
            link_retry_backoff_ms: 1000,
            link_max_attempts: 20,

            // Probe
            probe_host: "clients3.google.com".to_string(),
            probe_port: 80,
            probe_interval_ms: 10_000,
            probe_timeout_ms: 3000,

            // LED
            blink_half_period_ms: 1000,

            // Actuator
            unlock_pulse_ms: 3000,

            // Keys
            public_key_path: "keys/command_public.pem".to_string(),
            private_key_path: "keys/device_private.pem".to_string(),

            // Timing
            control_loop_interval_ms: 100,
        }
    }
}

impl SystemConfig {
    /// Full URL of the access-confirmation endpoint.
    pub fn confirmation_url(&self) -> String {
        format!("{}/api/labs/access-confirmation", self.backend_base_url)
    }

    /// Range-check every field. Invalid configs are rejected, not clamped.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.mqtt_broker.is_empty() {
            return Err("mqtt_broker must not be empty");
        }
        if self.mqtt_client_id.is_empty() {
            return Err("mqtt_client_id must not be empty");
        }
        if self.command_topic.is_empty() {
            return Err("command_topic must not be empty");
        }
        if self.backend_base_url.is_empty() {
            return Err("backend_base_url must not be empty");
        }
        if self.probe_host.is_empty() {
            return Err("probe_host must not be empty");
        }
        if self.link_max_attempts == 0 {
            return Err("link_max_attempts must be at least 1");
        }
        if self.unlock_pulse_ms == 0 {
            return Err("unlock_pulse_ms must be non-zero");
        }
        if self.control_loop_interval_ms == 0 {
            return Err("control_loop_interval_ms must be non-zero");
        }
        if self.probe_interval_ms < self.probe_timeout_ms {
            return Err("probe_interval_ms must be >= probe_timeout_ms");
        }
        Ok(())
    }

    /// Parse a config from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.command_topic, "command/open-lock");
        assert_eq!(c.unlock_pulse_ms, 3000);
        assert_eq!(c.probe_interval_ms, 10_000);
        assert_eq!(c.blink_half_period_ms, 1000);
        assert_eq!(c.link_max_attempts, 20);
        assert_eq!(c.link_retry_backoff_ms, 1000);
        assert_eq!(c.session_retry_delay_ms, 2000);
    }

    #[test]
    fn confirmation_url_appends_fixed_path() {
        let c = SystemConfig {
            backend_base_url: "http://10.0.0.5:8080".to_string(),
            ..SystemConfig::default()
        };
        assert_eq!(
            c.confirmation_url(),
            "http://10.0.0.5:8080/api/labs/access-confirmation"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2 = SystemConfig::from_json(&json).unwrap();
        assert_eq!(c.mqtt_broker, c2.mqtt_broker);
        assert_eq!(c.unlock_pulse_ms, c2.unlock_pulse_ms);
        assert_eq!(c.probe_port, c2.probe_port);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = SystemConfig::from_json(r#"{"mqtt_broker":"10.1.2.3"}"#).unwrap();
        assert_eq!(c.mqtt_broker, "10.1.2.3");
        assert_eq!(c.command_topic, "command/open-lock");
    }

    #[test]
    fn rejects_zero_pulse() {
        let c = SystemConfig {
            unlock_pulse_ms: 0,
            ..SystemConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_empty_topic() {
        let c = SystemConfig {
            command_topic: String::new(),
            ..SystemConfig::default()
        };
        assert!(c.validate().is_err());
    }
}
