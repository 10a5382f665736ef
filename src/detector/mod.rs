//! Unusual activity detection module
//!
//! Consumes normalized stream events and runs four independent anomaly
//! rules: flash price moves, whale trades, volume spikes, and order-book
//! imbalance. Alerts are debounced per (kind, asset) with a configurable
//! cooldown.

mod detector;
mod types;

pub use detector::UnusualActivityDetector;
pub use types::{Alert, AlertDirection, AlertKind};
