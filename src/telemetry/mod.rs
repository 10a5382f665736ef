//! Telemetry module
//!
//! Structured logging and metrics counters for the activity engine. The
//! metrics exporter/server belongs to the embedding process, not this crate.

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{record_alert, record_event, record_suppressed};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level)
}
