//! Engine metrics
//!
//! Counters recorded through the `metrics` facade; whichever exporter the
//! embedding process installs picks them up.

use metrics::counter;

use crate::detector::AlertKind;

/// Count one processed input event
pub fn record_event(kind: &'static str) {
    counter!("activity_events_total", "type" => kind).increment(1);
}

/// Count one emitted alert
pub fn record_alert(kind: AlertKind) {
    counter!("activity_alerts_total", "kind" => kind.as_str()).increment(1);
}

/// Count one alert suppressed by cooldown
pub fn record_suppressed(kind: AlertKind) {
    counter!("activity_alerts_suppressed_total", "kind" => kind.as_str()).increment(1);
}
