//! GPIO pin assignments for the Gatewise lock controller board.

/// Lock actuator output (active high, pulsed).
pub const LOCK_GPIO: i32 = 21;

/// Connectivity status LED (single colour, active high).
pub const STATUS_LED_GPIO: i32 = 15;
