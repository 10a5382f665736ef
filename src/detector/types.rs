//! Alert types
//!
//! An `Alert` is the only output of the activity engine. It is an immutable
//! record; the delivery collaborator (webhook formatter, bot) treats it as
//! opaque.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of unusual activity detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Large price change in a single update
    FlashMove,
    /// Single trade with outsized notional value
    WhaleEntry,
    /// Recent volume far above the rolling baseline
    VolumeSpike,
    /// Resting size skewed heavily to one side of the book
    OrderbookImbalance,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::FlashMove => "flash_move",
            AlertKind::WhaleEntry => "whale_entry",
            AlertKind::VolumeSpike => "volume_spike",
            AlertKind::OrderbookImbalance => "orderbook_imbalance",
        }
    }
}

/// Trading interpretation of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Bullish,
    Bearish,
    Neutral,
}

/// A detected unusual-activity condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert identifier
    pub id: Uuid,
    /// What was detected
    pub kind: AlertKind,
    /// Market (condition) identifier
    pub market: String,
    /// Outcome token identifier
    pub asset_id: String,
    /// Human-readable market title, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_title: Option<String>,
    /// Trading interpretation
    pub direction: AlertDirection,
    /// Size of the anomaly in the rule's own units (percent, notional,
    /// multiple, or ratio)
    pub magnitude: Decimal,
    /// Rule-specific key/value context
    pub details: serde_json::Value,
    /// One-line human explanation
    pub reasoning: String,
    /// Timestamp of the event that triggered the alert
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    /// Create a new alert
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: AlertKind,
        market: impl Into<String>,
        asset_id: impl Into<String>,
        direction: AlertDirection,
        magnitude: Decimal,
        details: serde_json::Value,
        reasoning: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            market: market.into(),
            asset_id: asset_id.into(),
            market_title: None,
            direction,
            magnitude,
            details,
            reasoning: reasoning.into(),
            timestamp,
        }
    }

    /// Attach a human-readable market title
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.market_title = title;
        self
    }

    pub fn is_bullish(&self) -> bool {
        self.direction == AlertDirection::Bullish
    }

    pub fn is_bearish(&self) -> bool {
        self.direction == AlertDirection::Bearish
    }
}
