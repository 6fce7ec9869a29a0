//! MQTT session adapter over the synchronous `rumqttc` client.
//!
//! Implements [`SessionPort`]: one broker session subscribed to the
//! single command topic. The sync `Client`/`Connection` pair fits the
//! poll-driven control loop — no executor, no background tasks beyond
//! rumqttc's own I/O thread.
//!
//! Reconnect policy lives in
//! [`LinkManager::service_session`](crate::net::link::LinkManager::service_session);
//! this adapter only reports loss (via `is_connected`) and performs
//! single connect attempts. Each attempt builds a fresh client, so no
//! stale session state survives a drop.

use std::time::{Duration, Instant};

use log::{info, warn};
use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};

use crate::app::ports::{SessionError, SessionPort};
use crate::config::SystemConfig;

const KEEP_ALIVE: Duration = Duration::from_secs(5);

/// How long one poll() drain waits for a pending notification.
const DRAIN_WAIT: Duration = Duration::from_millis(1);

pub struct MqttSession {
    broker: String,
    port: u16,
    client_id: String,
    topic: String,
    connect_timeout: Duration,
    inner: Option<(Client, Connection)>,
    connected: bool,
}

impl MqttSession {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            broker: config.mqtt_broker.clone(),
            port: config.mqtt_port,
            client_id: config.mqtt_client_id.clone(),
            topic: config.command_topic.clone(),
            connect_timeout: Duration::from_millis(u64::from(config.session_connect_timeout_ms)),
            inner: None,
            connected: false,
        }
    }

    fn drop_session(&mut self) {
        self.inner = None;
        self.connected = false;
    }
}

impl SessionPort for MqttSession {
    fn connect(&mut self) -> Result<(), SessionError> {
        self.drop_session();

        let mut options = MqttOptions::new(self.client_id.clone(), self.broker.clone(), self.port);
        options.set_keep_alive(KEEP_ALIVE);

        let (client, mut connection) = Client::new(options, 16);

        // Queue the subscription before pumping the connection; it is
        // flushed as soon as the session comes up.
        if client.subscribe(self.topic.clone(), QoS::AtLeastOnce).is_err() {
            return Err(SessionError::SubscribeFailed);
        }

        // Pump until ConnAck or deadline.
        let deadline = Instant::now() + self.connect_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("mqtt: connect timed out after {:?}", self.connect_timeout);
                return Err(SessionError::ConnectFailed);
            }
            match connection.recv_timeout(remaining) {
                Ok(Ok(Event::Incoming(Packet::ConnAck(_)))) => {
                    info!(
                        "mqtt: connected to {}:{}, subscribed to '{}'",
                        self.broker, self.port, self.topic
                    );
                    self.inner = Some((client, connection));
                    self.connected = true;
                    return Ok(());
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    warn!("mqtt: connect failed: {e}");
                    return Err(SessionError::ConnectFailed);
                }
                Err(_) => {
                    warn!("mqtt: connect timed out after {:?}", self.connect_timeout);
                    return Err(SessionError::ConnectFailed);
                }
            }
        }
    }

    fn disconnect(&mut self) {
        if let Some((client, _)) = &self.inner {
            let _ = client.disconnect();
        }
        self.drop_session();
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn poll(&mut self, on_message: &mut dyn FnMut(&str, &[u8])) {
        let Some((_, connection)) = self.inner.as_mut() else {
            return;
        };

        let mut lost = false;
        loop {
            match connection.recv_timeout(DRAIN_WAIT) {
                Ok(Ok(Event::Incoming(Packet::Publish(publish)))) => {
                    on_message(&publish.topic, &publish.payload);
                }
                Ok(Ok(Event::Incoming(Packet::Disconnect))) => {
                    warn!("mqtt: broker sent disconnect");
                    lost = true;
                    break;
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    warn!("mqtt: session lost: {e}");
                    lost = true;
                    break;
                }
                // Nothing pending.
                Err(_) => break,
            }
        }

        if lost {
            self.drop_session();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(port: u16) -> SystemConfig {
        SystemConfig {
            mqtt_broker: "127.0.0.1".to_string(),
            mqtt_port: port,
            session_connect_timeout_ms: 500,
            ..SystemConfig::default()
        }
    }

    #[test]
    fn starts_disconnected() {
        let session = MqttSession::new(&test_config(1883));
        assert!(!session.is_connected());
    }

    #[test]
    fn poll_on_dead_session_is_a_noop() {
        let mut session = MqttSession::new(&test_config(1883));
        let mut seen = 0u32;
        session.poll(&mut |_, _| seen += 1);
        assert_eq!(seen, 0);
    }

    #[test]
    fn connect_to_closed_port_fails() {
        // Bind-then-drop to get a port with no listener.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut session = MqttSession::new(&test_config(port));
        assert_eq!(session.connect(), Err(SessionError::ConnectFailed));
        assert!(!session.is_connected());
    }
}
