//! TCP reachability probe.
//!
//! One bounded-timeout connect to a fixed well-known host:port. The
//! socket is closed immediately on success — no data is exchanged;
//! reaching SYN-ACK is the whole verdict.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::debug;

use crate::app::ports::ReachabilityProbe;
use crate::config::SystemConfig;

pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            host: config.probe_host.clone(),
            port: config.probe_port,
            timeout: Duration::from_millis(u64::from(config.probe_timeout_ms)),
        }
    }
}

impl ReachabilityProbe for TcpProbe {
    fn probe(&mut self) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!("probe: resolving {}:{} failed: {e}", self.host, self.port);
                return false;
            }
        };

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                // Drop closes the socket; nothing is sent or read.
                Ok(_stream) => return true,
                Err(e) => debug!("probe: {addr} unreachable: {e}"),
            }
        }
        false
    }
}
