//! Hardware drivers: lock output, status LED, raw GPIO shims.

pub mod hw_init;
pub mod lock;
pub mod status_led;
