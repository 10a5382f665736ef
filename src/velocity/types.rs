//! Velocity tracking types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of metric a window tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Price,
    Volume,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Price => "price",
            MetricKind::Volume => "volume",
        }
    }
}

/// Typed metric identifier: a kind plus the market/asset symbol it tracks
///
/// Replaces stringly keys like `"price:BTC-YES"` so a mistyped namespace
/// cannot compile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricKey {
    pub kind: MetricKind,
    pub symbol: String,
}

impl MetricKey {
    pub fn price(symbol: impl Into<String>) -> Self {
        Self {
            kind: MetricKind::Price,
            symbol: symbol.into(),
        }
    }

    pub fn volume(symbol: impl Into<String>) -> Self {
        Self {
            kind: MetricKind::Volume,
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.symbol)
    }
}

/// One recorded observation of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub value: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(value: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

/// Trend of a metric's velocity over its window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocityDirection {
    /// Velocity magnitude roughly constant
    Steady,
    /// Velocity magnitude increasing
    Accelerating,
    /// Velocity magnitude decreasing
    Decelerating,
}

/// Derived rate-of-change statistics for one metric window
///
/// Computed on demand; never stored. Returned only once a window holds at
/// least the configured minimum number of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VelocityMetrics {
    /// Rate of change between the two most recent samples (units/second)
    pub current_velocity: Decimal,
    /// Rate of change between the oldest and newest sample (units/second)
    pub avg_velocity: Decimal,
    /// Change in velocity over the window (units/second^2)
    pub acceleration: Decimal,
    /// Trend classification of the velocity magnitude
    pub direction: VelocityDirection,
    /// Most recent step deviates from the window baseline beyond the
    /// configured multiple
    pub is_unusual: bool,
    /// Number of samples the window held at computation time
    pub sample_count: usize,
}
