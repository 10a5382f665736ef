//! Market velocity monitor implementation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;
use std::collections::BTreeSet;

use crate::config::VelocityConfig;
use crate::detector::{Alert, AlertDirection, AlertKind};
use crate::velocity::{MetricKey, VelocityMetrics, VelocityTracker};

use super::types::{MarketState, OverallState};

/// Tracks price and volume velocity per market and classifies overall state
#[derive(Debug, Clone)]
pub struct MarketVelocityMonitor {
    prices: VelocityTracker,
    volumes: VelocityTracker,
}

impl MarketVelocityMonitor {
    /// Create a monitor with the given velocity configuration
    pub fn new(config: VelocityConfig) -> Self {
        Self {
            prices: VelocityTracker::new(config.clone()),
            volumes: VelocityTracker::new(config),
        }
    }

    /// Create a monitor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(VelocityConfig::default())
    }

    /// Record one trade's price and volume for a market
    pub fn record_trade(
        &mut self,
        market_id: &str,
        price: Decimal,
        volume: Decimal,
        timestamp: DateTime<Utc>,
    ) {
        self.prices.track_price(market_id, price, timestamp);
        self.volumes.track_volume(market_id, volume, timestamp);
    }

    /// Current state of a market; total, never fails
    ///
    /// Unknown or cold markets come back `Calm` with no alerts.
    pub fn market_state(&self, market_id: &str) -> MarketState {
        let price_key = MetricKey::price(market_id);
        let volume_key = MetricKey::volume(market_id);
        let price = self.prices.metrics(&price_key);
        let volume = self.volumes.metrics(&volume_key);

        let price_unusual = price.is_some_and(|m| m.is_unusual);
        let volume_unusual = volume.is_some_and(|m| m.is_unusual);

        let overall = match (price_unusual, volume_unusual) {
            (true, true) => OverallState::Volatile,
            (true, false) | (false, true) => OverallState::Unusual,
            (false, false) => OverallState::Calm,
        };

        let mut alerts = Vec::new();
        if price_unusual {
            if let (Some(metrics), Some(ts)) = (price, self.prices.last_timestamp(&price_key)) {
                alerts.push(velocity_alert(
                    AlertKind::FlashMove,
                    market_id,
                    "price",
                    &metrics,
                    ts,
                ));
            }
        }
        if volume_unusual {
            if let (Some(metrics), Some(ts)) = (volume, self.volumes.last_timestamp(&volume_key)) {
                alerts.push(velocity_alert(
                    AlertKind::VolumeSpike,
                    market_id,
                    "volume",
                    &metrics,
                    ts,
                ));
            }
        }

        MarketState {
            market: market_id.to_string(),
            price,
            volume,
            alerts,
            overall,
        }
    }

    /// States of all tracked markets that are not calm
    pub fn unusual_markets(&self) -> Vec<MarketState> {
        let symbols: BTreeSet<&str> = self
            .prices
            .keys()
            .chain(self.volumes.keys())
            .map(|k| k.symbol.as_str())
            .collect();

        symbols
            .into_iter()
            .map(|s| self.market_state(s))
            .filter(|state| !state.is_calm())
            .collect()
    }

    /// Forget every tracked market
    pub fn clear(&mut self) {
        self.prices.clear_all();
        self.volumes.clear_all();
    }

    /// Number of markets with any recorded history
    pub fn tracked_count(&self) -> usize {
        self.prices.tracked_count().max(self.volumes.tracked_count())
    }
}

fn velocity_alert(
    kind: AlertKind,
    market_id: &str,
    metric_name: &str,
    metrics: &VelocityMetrics,
    timestamp: DateTime<Utc>,
) -> Alert {
    let direction = if metrics.current_velocity > Decimal::ZERO {
        AlertDirection::Bullish
    } else if metrics.current_velocity < Decimal::ZERO {
        AlertDirection::Bearish
    } else {
        AlertDirection::Neutral
    };

    Alert::new(
        kind,
        market_id,
        market_id,
        direction,
        metrics.current_velocity.abs(),
        json!({
            "metric": metric_name,
            "current_velocity": metrics.current_velocity.to_f64().unwrap_or_default(),
            "avg_velocity": metrics.avg_velocity.to_f64().unwrap_or_default(),
        }),
        format!(
            "{} velocity {}/s broke away from the {}/s window average",
            metric_name, metrics.current_velocity, metrics.avg_velocity
        ),
        timestamp,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_unknown_market_is_calm() {
        let monitor = MarketVelocityMonitor::with_defaults();
        let state = monitor.market_state("nope");
        assert!(state.is_calm());
        assert!(state.alerts.is_empty());
        assert!(state.price.is_none());
        assert!(state.volume.is_none());
    }

    #[test]
    fn test_cold_market_is_calm() {
        let mut monitor = MarketVelocityMonitor::with_defaults();
        monitor.record_trade("m", dec!(0.50), dec!(100), ts(0));
        let state = monitor.market_state("m");
        assert!(state.is_calm());
        assert!(state.price.is_none());
    }

    #[test]
    fn test_steady_market_is_calm_with_metrics() {
        let mut monitor = MarketVelocityMonitor::with_defaults();
        for i in 0..5 {
            monitor.record_trade("m", dec!(0.50), dec!(100), ts(i));
        }
        let state = monitor.market_state("m");
        assert!(state.is_calm());
        assert!(state.price.is_some());
        assert!(state.volume.is_some());
        assert!(state.alerts.is_empty());
    }

    #[test]
    fn test_price_jump_flags_market_unusual() {
        let mut monitor = MarketVelocityMonitor::with_defaults();
        // Flat price, flat volume, then a violent price move
        for i in 0..4 {
            monitor.record_trade("m", dec!(0.50) + Decimal::new(i, 2), dec!(100), ts(i));
        }
        monitor.record_trade("m", dec!(0.90), dec!(100), ts(4));

        let state = monitor.market_state("m");
        assert_eq!(state.overall, OverallState::Unusual);
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].kind, AlertKind::FlashMove);
        assert!(state.alerts[0].is_bullish());
    }

    #[test]
    fn test_unusual_markets_subset() {
        let mut monitor = MarketVelocityMonitor::with_defaults();
        for i in 0..5 {
            monitor.record_trade("calm", dec!(0.50), dec!(100), ts(i));
            monitor.record_trade("wild", dec!(0.50) + Decimal::new(i, 2), dec!(100), ts(i));
        }
        monitor.record_trade("wild", dec!(0.95), dec!(100), ts(5));

        let unusual = monitor.unusual_markets();
        assert_eq!(unusual.len(), 1);
        assert_eq!(unusual[0].market, "wild");
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut monitor = MarketVelocityMonitor::with_defaults();
        for i in 0..5 {
            monitor.record_trade("m", dec!(0.50), dec!(100), ts(i));
        }
        assert_eq!(monitor.tracked_count(), 1);

        monitor.clear();
        assert_eq!(monitor.tracked_count(), 0);
        assert!(monitor.market_state("m").is_calm());
    }
}
