//! Gatewise Lock Controller — Main Entry Point
//!
//! Hexagonal architecture with a single-threaded, poll-driven loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  WifiLink      MqttSession   HttpConfirmation   TcpProbe       │
//! │  (LinkPort)    (SessionPort) (ConfirmationPort) (Reachability) │
//! │  LockDriver    StatusLed     LogEventSink       ProcessRestart │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │   AccessService (verify · attest · gate)               │    │
//! │  │   LinkManager + link FSM · ConnectivityMonitor          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation — connects, signing, the confirmation POST, the
//! lock pulse — blocks the one control thread. Commands are handled
//! strictly in delivery order; nothing here needs a lock.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};

use gatewise::adapters::log_sink::LogEventSink;
use gatewise::adapters::probe::TcpProbe;
use gatewise::adapters::restart::ProcessRestart;
use gatewise::adapters::time::SystemTimeAdapter;
use gatewise::adapters::wifi::WifiLink;
use gatewise::app::events::AppEvent;
use gatewise::app::ports::{ConfirmationPort, EventSink, SessionPort};
use gatewise::app::service::AccessService;
use gatewise::auth::keys::KeyMaterial;
use gatewise::config::SystemConfig;
use gatewise::drivers::hw_init;
use gatewise::drivers::lock::LockDriver;
use gatewise::drivers::status_led::StatusLed;
use gatewise::error::Error;
use gatewise::fsm::LinkState;
use gatewise::net::link::LinkManager;
use gatewise::net::monitor::ConnectivityMonitor;

// ── Entry points ──────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("gatewise v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config();
    let keys = load_keys(&config)?;

    let session = gatewise::adapters::mqtt::MqttSession::new(&config);
    let confirm = gatewise::adapters::http::HttpConfirmation::new(&config)?;

    run(config, keys, session, confirm)
}

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("gatewise v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config();
    let keys = load_keys(&config)?;

    // Transport placeholders: the ESP-IDF MQTT client and HTTP client
    // are wired in together with provisioning. Until then the device
    // boots with a dead session — link management and the status LED
    // still run.
    let session = NullSession;
    let confirm = NullConfirmation;

    run(config, keys, session, confirm)
}

// ── Bootstrap helpers ─────────────────────────────────────────

/// Load config from the path given as the first argument (default
/// `gatewise.json`), falling back to defaults with a warning.
fn load_config() -> SystemConfig {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "gatewise.json".to_string());

    match std::fs::read_to_string(&path) {
        Ok(text) => match SystemConfig::from_json(&text) {
            Ok(config) => {
                info!("config loaded from {path}");
                config
            }
            Err(e) => {
                warn!("config parse failed ({e}), using defaults");
                SystemConfig::default()
            }
        },
        Err(e) => {
            warn!("config not readable at {path} ({e}), using defaults");
            SystemConfig::default()
        }
    }
}

fn load_keys(config: &SystemConfig) -> Result<KeyMaterial> {
    let public_pem = std::fs::read_to_string(&config.public_key_path)
        .with_context(|| format!("reading {}", config.public_key_path))?;
    let private_pem = std::fs::read_to_string(&config.private_key_path)
        .with_context(|| format!("reading {}", config.private_key_path))?;
    let keys = KeyMaterial::from_pems(&public_pem, &private_pem).map_err(Error::from)?;
    Ok(keys)
}

// ── Control loop ──────────────────────────────────────────────

fn run(
    config: SystemConfig,
    keys: KeyMaterial,
    mut session: impl SessionPort,
    mut confirm: impl ConfirmationPort,
) -> Result<()> {
    config.validate().map_err(Error::Config)?;

    hw_init::init_outputs().map_err(|e| anyhow!("hw init: {e}"))?;

    // Link credentials are provisioned out of band; the environment
    // stands in for the provisioning store on bench setups.
    let mut wifi = WifiLink::new();
    let ssid = std::env::var("GATEWISE_WIFI_SSID").unwrap_or_else(|_| "gatewise-lab".to_string());
    let psk = std::env::var("GATEWISE_WIFI_PSK").unwrap_or_default();
    wifi.set_credentials(&ssid, &psk)
        .map_err(|e| anyhow!("wifi credentials: {e}"))?;

    let mut link = LinkManager::new(&config, wifi, ProcessRestart);
    let mut monitor = ConnectivityMonitor::new(&config, TcpProbe::new(&config));
    let mut led = StatusLed::new(config.blink_half_period_ms);
    let mut lock = LockDriver::new(config.unlock_pulse_ms);
    let time = SystemTimeAdapter::new();
    let mut sink = LogEventSink::new();
    let mut access = AccessService::new(&keys);

    link.start();
    sink.emit(&AppEvent::Started);
    info!("System ready. Entering control loop.");

    let tick_ms = config.control_loop_interval_ms;
    let mut prev_link = link.state();
    loop {
        // (a) Link health and reconnection.
        let link_state = link.service(&mut sink);

        // Probe eagerly whenever the link (or session) comes back.
        if link_state == LinkState::Up && prev_link != LinkState::Up {
            monitor.probe_now();
        }
        prev_link = link_state;

        // (b) Session upkeep; a fresh session triggers an eager probe.
        if link.service_session(&mut session, &mut sink) {
            monitor.probe_now();
        }

        // Inbound commands, strictly in delivery order. The handler
        // blocks for the full verify → confirm → pulse round-trip.
        session.poll(&mut |topic, payload| {
            access.handle_message(topic, payload, &mut confirm, &mut lock, &time, &mut sink);
        });

        // (c) Periodic reachability probe.
        monitor.tick(tick_ms, link_state, &mut sink);

        // (d) Status output.
        led.set_pattern(monitor.pattern(link_state));
        led.tick(tick_ms);

        std::thread::sleep(Duration::from_millis(u64::from(tick_ms)));
    }
}

// ── ESP-IDF transport placeholders ────────────────────────────

#[cfg(target_os = "espidf")]
struct NullSession;

#[cfg(target_os = "espidf")]
impl SessionPort for NullSession {
    fn connect(&mut self) -> std::result::Result<(), gatewise::app::ports::SessionError> {
        Err(gatewise::app::ports::SessionError::ConnectFailed)
    }
    fn disconnect(&mut self) {}
    fn is_connected(&self) -> bool {
        false
    }
    fn poll(&mut self, _on_message: &mut dyn FnMut(&str, &[u8])) {}
}

#[cfg(target_os = "espidf")]
struct NullConfirmation;

#[cfg(target_os = "espidf")]
impl ConfirmationPort for NullConfirmation {
    fn submit(
        &mut self,
        _attestation: &gatewise::auth::attestation::ConfirmationAttestation,
    ) -> gatewise::app::ports::ConfirmationOutcome {
        gatewise::app::ports::ConfirmationOutcome::Unreachable
    }
}
