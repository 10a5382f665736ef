//! Normalized stream event types
//!
//! The transport adapter (WebSocket client, out of scope here) translates raw
//! venue messages into these types before handing them to the detector. For a
//! given asset the adapter must deliver events in non-decreasing timestamp
//! order; the engine does not resequence.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Taker side of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A single resting level of an order book side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub size: Decimal,
}

/// A price change for one outcome token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChangeEvent {
    /// Market (condition) identifier
    pub market: String,
    /// Outcome token identifier
    pub asset_id: String,
    /// Price before the change
    pub old_price: Decimal,
    /// Price after the change
    pub new_price: Decimal,
    /// Signed change in percent (e.g. 20 = +20%)
    pub change_pct: Decimal,
    /// Venue timestamp of the change
    pub timestamp: DateTime<Utc>,
}

/// A single executed trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeUpdate {
    pub market: String,
    pub asset_id: String,
    /// Execution price (0.0 to 1.0 for outcome tokens)
    pub price: Decimal,
    /// Number of shares traded
    pub size: Decimal,
    pub side: TradeSide,
    pub timestamp: DateTime<Utc>,
}

impl TradeUpdate {
    /// Dollar value of the trade
    pub fn notional(&self) -> Decimal {
        self.price * self.size
    }
}

/// An L2 order book snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderbookUpdate {
    pub market: String,
    pub asset_id: String,
    /// Bid levels, best first
    pub bids: Vec<PriceLevel>,
    /// Ask levels, best first
    pub asks: Vec<PriceLevel>,
    pub timestamp: DateTime<Utc>,
}

impl OrderbookUpdate {
    /// Total resting bid size (levels with non-positive size are skipped)
    pub fn bid_depth(&self) -> Decimal {
        Self::depth(&self.bids)
    }

    /// Total resting ask size
    pub fn ask_depth(&self) -> Decimal {
        Self::depth(&self.asks)
    }

    fn depth(levels: &[PriceLevel]) -> Decimal {
        levels
            .iter()
            .filter(|l| l.size > Decimal::ZERO)
            .map(|l| l.size)
            .sum()
    }
}
