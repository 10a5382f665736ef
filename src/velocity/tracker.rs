//! Velocity tracker: keyed metric windows plus rate-of-change math
//!
//! Velocity is a finite-difference rate (value units per second).
//! Acceleration compares the endpoint velocity of the second half of a
//! window against the first half. A metric is unusual when its most recent
//! step velocity breaks away from the baseline established by the earlier
//! steps in the window.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use crate::config::VelocityConfig;

use super::types::{MetricKey, Sample, VelocityDirection, VelocityMetrics};
use super::window::MetricWindow;

/// Tracks rate-of-change statistics for a set of named metrics
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    config: VelocityConfig,
    span: Duration,
    windows: HashMap<MetricKey, MetricWindow>,
}

impl VelocityTracker {
    /// Create a tracker with the given configuration
    pub fn new(config: VelocityConfig) -> Self {
        let span = Duration::milliseconds(config.window_ms as i64);
        Self {
            config,
            span,
            windows: HashMap::new(),
        }
    }

    /// Create a tracker with default configuration
    pub fn with_defaults() -> Self {
        Self::new(VelocityConfig::default())
    }

    /// Record an observation; never fails
    pub fn add_point(&mut self, key: MetricKey, value: Decimal, timestamp: DateTime<Utc>) {
        let window = self
            .windows
            .entry(key)
            .or_insert_with(|| MetricWindow::new(self.span));
        window.push(Sample::new(value, timestamp));
    }

    /// Record a price observation for a symbol
    pub fn track_price(&mut self, symbol: &str, price: Decimal, timestamp: DateTime<Utc>) {
        self.add_point(MetricKey::price(symbol), price, timestamp);
    }

    /// Record a volume observation for a symbol
    pub fn track_volume(&mut self, symbol: &str, volume: Decimal, timestamp: DateTime<Utc>) {
        self.add_point(MetricKey::volume(symbol), volume, timestamp);
    }

    /// Derived metrics for a key; `None` while the window is cold or the
    /// key is unknown
    pub fn metrics(&self, key: &MetricKey) -> Option<VelocityMetrics> {
        let window = self.windows.get(key)?;
        compute_metrics(window, &self.config)
    }

    /// Convenience accessor for the most recent velocity
    pub fn current_velocity(&self, key: &MetricKey) -> Option<Decimal> {
        self.metrics(key).map(|m| m.current_velocity)
    }

    /// Drop one metric's history
    pub fn clear_metric(&mut self, key: &MetricKey) {
        self.windows.remove(key);
    }

    /// Drop all history
    pub fn clear_all(&mut self) {
        self.windows.clear();
    }

    /// Number of metrics currently tracked
    pub fn tracked_count(&self) -> usize {
        self.windows.len()
    }

    /// Iterate the keys currently tracked
    pub fn keys(&self) -> impl Iterator<Item = &MetricKey> {
        self.windows.keys()
    }

    /// Timestamp of the newest sample recorded for a key
    pub fn last_timestamp(&self, key: &MetricKey) -> Option<DateTime<Utc>> {
        self.windows.get(key).and_then(|w| w.newest_timestamp())
    }

    /// Iterate the raw samples held for a key, oldest first
    pub fn samples<'a>(&'a self, key: &MetricKey) -> impl Iterator<Item = &'a Sample> + 'a {
        self.windows.get(key).into_iter().flat_map(|w| w.iter())
    }

    /// Drop windows whose newest sample is older than `max_age`
    ///
    /// Everything inside such a window is already past its span, so no live
    /// data is lost.
    pub fn purge_idle(&mut self, now: DateTime<Utc>, max_age: Duration) {
        self.windows
            .retain(|_, w| w.newest_timestamp().is_some_and(|t| now - t <= max_age));
    }
}

const MS_PER_SEC: Decimal = dec!(1000);

/// Finite-difference velocity between two samples, units per second
///
/// Identical timestamps yield zero rather than dividing by zero.
fn velocity_between(a: &Sample, b: &Sample) -> Decimal {
    let dt_ms = (b.timestamp - a.timestamp).num_milliseconds();
    if dt_ms <= 0 {
        return Decimal::ZERO;
    }
    (b.value - a.value) * MS_PER_SEC / Decimal::from(dt_ms)
}

fn compute_metrics(window: &MetricWindow, config: &VelocityConfig) -> Option<VelocityMetrics> {
    let n = window.len();
    if n < config.min_data_points.max(2) {
        return None;
    }

    let first = window.first()?;
    let last = window.last()?;
    let current_velocity = velocity_between(window.get(n - 2)?, last);
    let avg_velocity = velocity_between(first, last);

    // Acceleration: second-half endpoint velocity vs first-half, over the
    // window's elapsed time.
    let mid = window.get(n / 2)?;
    let first_half = velocity_between(first, mid);
    let second_half = velocity_between(mid, last);
    let elapsed_ms = (last.timestamp - first.timestamp).num_milliseconds();
    let acceleration = if elapsed_ms <= 0 {
        Decimal::ZERO
    } else {
        (second_half - first_half) * MS_PER_SEC / Decimal::from(elapsed_ms)
    };

    let magnitude_delta = second_half.abs() - first_half.abs();
    let direction = if magnitude_delta.abs() <= config.steady_epsilon {
        VelocityDirection::Steady
    } else if magnitude_delta > Decimal::ZERO {
        VelocityDirection::Accelerating
    } else {
        VelocityDirection::Decelerating
    };

    Some(VelocityMetrics {
        current_velocity,
        avg_velocity,
        acceleration,
        direction,
        is_unusual: is_unusual(window, config),
        sample_count: n,
    })
}

/// The latest step stands out against the run that preceded it
fn is_unusual(window: &MetricWindow, config: &VelocityConfig) -> bool {
    let n = window.len();
    if n < 3 {
        return false;
    }

    let mut baseline_sum = Decimal::ZERO;
    for i in 1..n - 1 {
        let step = velocity_between(window.get(i - 1).unwrap(), window.get(i).unwrap());
        baseline_sum += step.abs();
    }
    let baseline = baseline_sum / Decimal::from(n as i64 - 2);
    let current = velocity_between(window.get(n - 2).unwrap(), window.last().unwrap()).abs();

    if baseline.is_zero() {
        current > Decimal::ZERO
    } else {
        current > baseline * config.unusual_multiple
    }
}
