//! Driven adapters — implementations of the port traits against the
//! real world (radio, broker, backend, clock, process).
//!
//! Network transports (`mqtt`, `http`) are std-only; on ESP-IDF the
//! platform services replace them (wired in `main.rs`).

pub mod log_sink;
pub mod probe;
pub mod restart;
pub mod time;
pub mod wifi;

#[cfg(not(target_os = "espidf"))]
pub mod http;
#[cfg(not(target_os = "espidf"))]
pub mod mqtt;
