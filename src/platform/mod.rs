//! Platform abstraction layer
//!
//! The simulation never reads the wall clock; only the outer layers do
//! (high-score timestamps, the frame driver's caller, default seeds).

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Seed for runs that don't pin one in config
pub fn default_seed() -> u64 {
    rand::random()
}
