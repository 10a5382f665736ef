//! Market state types

use serde::{Deserialize, Serialize};

use crate::detector::Alert;
use crate::velocity::VelocityMetrics;

/// Overall classification of one market's recent activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallState {
    /// Nothing unusual (or still cold)
    Calm,
    /// Exactly one of price/volume is unusual
    Unusual,
    /// Both price and volume are unusual
    Volatile,
}

/// Combined velocity view of one market
///
/// Always constructible: an unknown or cold market is `Calm` with no alerts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketState {
    /// Market/asset identifier
    pub market: String,
    /// Price velocity metrics, if warm
    pub price: Option<VelocityMetrics>,
    /// Volume velocity metrics, if warm
    pub volume: Option<VelocityMetrics>,
    /// Descriptive alerts raised by this evaluation (uncooled)
    pub alerts: Vec<Alert>,
    pub overall: OverallState,
}

impl MarketState {
    /// A calm state for a market with no usable history
    pub fn calm(market: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            price: None,
            volume: None,
            alerts: Vec::new(),
            overall: OverallState::Calm,
        }
    }

    pub fn is_calm(&self) -> bool {
        self.overall == OverallState::Calm
    }
}
