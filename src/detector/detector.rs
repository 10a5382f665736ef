//! Unusual activity detector
//!
//! Four independent rules evaluated synchronously against each incoming
//! event. Every rule is total: malformed numeric input degrades to "no
//! alert" rather than an error, since a false negative is preferable to
//! crashing the stream pipeline. All time comes from event timestamps; the
//! detector never reads the wall clock.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;
use std::collections::HashMap;

use crate::config::{DetectorConfig, VelocityConfig};
use crate::events::{OrderbookUpdate, PriceChangeEvent, TradeSide, TradeUpdate};
use crate::telemetry::{record_alert, record_event, record_suppressed};
use crate::velocity::{MetricKey, VelocityTracker};

use super::types::{Alert, AlertDirection, AlertKind};

/// Streaming anomaly detector with per-asset state and debounced alerting
///
/// Owns all of its auxiliary state (price/volume windows, trade history,
/// cooldown registry, title map); nothing outside the engine mutates it.
/// One instance per stream; independent instances are fully isolated.
pub struct UnusualActivityDetector {
    config: DetectorConfig,
    /// Recent per-asset price history (flash-move window)
    prices: VelocityTracker,
    /// Per-asset trade sizes (volume window); backs the volume-spike baseline
    volumes: VelocityTracker,
    /// Last emit time per (kind, asset); refreshed only by emitted alerts
    cooldowns: HashMap<(AlertKind, String), DateTime<Utc>>,
    /// Asset id to human-readable market title, set by the transport
    titles: HashMap<String, String>,
}

impl UnusualActivityDetector {
    /// Create a detector with the given configuration
    pub fn new(config: DetectorConfig) -> Self {
        let price_cfg = VelocityConfig {
            window_ms: config.flash_move_window_ms,
            min_data_points: config.min_data_points,
            ..VelocityConfig::default()
        };
        let volume_cfg = VelocityConfig {
            window_ms: config.volume_window_ms,
            min_data_points: config.min_data_points,
            ..VelocityConfig::default()
        };
        Self {
            config,
            prices: VelocityTracker::new(price_cfg),
            volumes: VelocityTracker::new(volume_cfg),
            cooldowns: HashMap::new(),
            titles: HashMap::new(),
        }
    }

    /// Create a detector with default configuration
    pub fn with_defaults() -> Self {
        Self::new(DetectorConfig::default())
    }

    /// Rule 1: flash move
    ///
    /// At most one alert per event. Below-threshold changes leave no trace
    /// beyond the rolling price window.
    pub fn process_price_change(&mut self, event: &PriceChangeEvent) -> Option<Alert> {
        record_event("price_change");

        if event.new_price <= Decimal::ZERO {
            tracing::debug!(asset = %event.asset_id, price = %event.new_price, "ignoring non-positive price");
            return None;
        }
        self.prices
            .track_price(&event.asset_id, event.new_price, event.timestamp);

        let change = event.change_pct;
        if change.abs() < self.config.flash_move_threshold_pct {
            return None;
        }
        if !self.cooldown_elapsed(AlertKind::FlashMove, &event.asset_id, event.timestamp) {
            return None;
        }

        let (direction, verb) = if change > Decimal::ZERO {
            (AlertDirection::Bullish, "spiked")
        } else {
            (AlertDirection::Bearish, "dropped")
        };
        let alert = Alert::new(
            AlertKind::FlashMove,
            &event.market,
            &event.asset_id,
            direction,
            change.abs(),
            json!({
                "price_move": change.to_f64().unwrap_or_default(),
                "old_price": event.old_price.to_f64().unwrap_or_default(),
                "new_price": event.new_price.to_f64().unwrap_or_default(),
            }),
            format!(
                "Price {} {:.1}% in one update ({} -> {})",
                verb,
                change.abs(),
                event.old_price,
                event.new_price
            ),
            event.timestamp,
        );
        Some(self.emit(alert))
    }

    /// Rules 2 and 3: whale trade and volume spike
    ///
    /// Zero, one, or two alerts: a single trade can be a whale entry and tip
    /// the volume baseline at the same time.
    pub fn process_trade(&mut self, trade: &TradeUpdate) -> Vec<Alert> {
        record_event("trade");
        let mut alerts = Vec::new();

        if trade.price <= Decimal::ZERO || trade.size <= Decimal::ZERO {
            tracing::debug!(asset = %trade.asset_id, "ignoring malformed trade");
            return alerts;
        }

        // Rolling per-asset trade history; the volume-spike rule reads it back
        self.volumes
            .track_volume(&trade.asset_id, trade.size, trade.timestamp);

        let notional = trade.notional();
        if notional >= self.config.whale_notional_threshold
            && self.cooldown_elapsed(AlertKind::WhaleEntry, &trade.asset_id, trade.timestamp)
        {
            let (direction, verb) = match trade.side {
                TradeSide::Buy => (AlertDirection::Bullish, "bought"),
                TradeSide::Sell => (AlertDirection::Bearish, "sold"),
            };
            let alert = Alert::new(
                AlertKind::WhaleEntry,
                &trade.market,
                &trade.asset_id,
                direction,
                notional,
                json!({
                    "notional": notional.to_f64().unwrap_or_default(),
                    "price": trade.price.to_f64().unwrap_or_default(),
                    "size": trade.size.to_f64().unwrap_or_default(),
                    "side": trade.side,
                }),
                format!(
                    "Whale {} {} shares at {} (${} notional)",
                    verb, trade.size, trade.price, notional
                ),
                trade.timestamp,
            );
            alerts.push(self.emit(alert));
        }

        if let Some(ratio) = self.volume_spike_ratio(&trade.asset_id, trade.timestamp) {
            if self.cooldown_elapsed(AlertKind::VolumeSpike, &trade.asset_id, trade.timestamp) {
                let alert = Alert::new(
                    AlertKind::VolumeSpike,
                    &trade.market,
                    &trade.asset_id,
                    AlertDirection::Neutral,
                    ratio,
                    json!({
                        "volume_multiple": ratio.to_f64().unwrap_or_default(),
                    }),
                    format!("Volume running {:.1}x the rolling baseline", ratio),
                    trade.timestamp,
                );
                alerts.push(self.emit(alert));
            }
        }

        alerts
    }

    /// Rule 4: order-book imbalance
    ///
    /// Zero or one alert. A snapshot with an empty (or zero-size) side is
    /// treated as malformed and ignored.
    pub fn process_book(&mut self, update: &OrderbookUpdate) -> Option<Alert> {
        record_event("book");

        let bid_depth = update.bid_depth();
        let ask_depth = update.ask_depth();
        if bid_depth <= Decimal::ZERO || ask_depth <= Decimal::ZERO {
            return None;
        }

        let (larger, smaller, direction, lead) = if bid_depth >= ask_depth {
            (bid_depth, ask_depth, AlertDirection::Bullish, "Bids")
        } else {
            (ask_depth, bid_depth, AlertDirection::Bearish, "Asks")
        };
        let ratio = larger / smaller;
        if ratio <= self.config.orderbook_imbalance_ratio {
            return None;
        }
        if !self.cooldown_elapsed(AlertKind::OrderbookImbalance, &update.asset_id, update.timestamp)
        {
            return None;
        }

        let alert = Alert::new(
            AlertKind::OrderbookImbalance,
            &update.market,
            &update.asset_id,
            direction,
            ratio,
            json!({
                "bid_depth": bid_depth.to_f64().unwrap_or_default(),
                "ask_depth": ask_depth.to_f64().unwrap_or_default(),
                "imbalance_ratio": ratio.to_f64().unwrap_or_default(),
            }),
            format!(
                "{} outweigh the other side {:.1}:1 ({} vs {})",
                lead, ratio, bid_depth, ask_depth
            ),
            update.timestamp,
        );
        Some(self.emit(alert))
    }

    /// Record a human-readable title used to enrich subsequent alerts
    pub fn set_market_title(&mut self, asset_id: impl Into<String>, title: impl Into<String>) {
        self.titles.insert(asset_id.into(), title.into());
    }

    /// Purge per-asset history past its retention horizon
    ///
    /// Total: safe on a detector with no data. Data still inside an active
    /// window is never discarded, so processing continues correctly right
    /// after a cleanup. Cooldown entries are left alone; they go stale on
    /// their own once the cooldown window elapses.
    pub fn cleanup(&mut self, now: DateTime<Utc>) {
        self.prices.purge_idle(
            now,
            Duration::milliseconds(self.config.flash_move_window_ms as i64),
        );
        self.volumes
            .purge_idle(now, Duration::milliseconds(self.config.volume_window_ms as i64));

        tracing::debug!(
            price_windows = self.prices.tracked_count(),
            volume_windows = self.volumes.tracked_count(),
            "cleanup complete"
        );
    }

    /// Number of assets with live trade history
    pub fn tracked_assets(&self) -> usize {
        self.volumes.tracked_count()
    }

    /// Recent volume rate over the trailing sub-window as a multiple of the
    /// preceding baseline rate; `None` until the baseline is warm or while
    /// the ratio is unremarkable
    fn volume_spike_ratio(&self, asset_id: &str, now: DateTime<Utc>) -> Option<Decimal> {
        let key = MetricKey::volume(asset_id);
        let spike_window_ms = self.config.volume_spike_window_ms as i64;
        let spike_cutoff = now - Duration::milliseconds(spike_window_ms);

        let mut earliest = None;
        let mut baseline_sum = Decimal::ZERO;
        let mut baseline_count = 0usize;
        let mut recent_sum = Decimal::ZERO;
        for sample in self.volumes.samples(&key) {
            earliest.get_or_insert(sample.timestamp);
            if sample.timestamp < spike_cutoff {
                baseline_sum += sample.value;
                baseline_count += 1;
            } else {
                recent_sum += sample.value;
            }
        }
        if baseline_count < self.config.min_data_points {
            return None;
        }

        let baseline_span_ms = (spike_cutoff - earliest?).num_milliseconds();
        if baseline_span_ms <= 0 {
            return None;
        }
        let baseline_rate = baseline_sum * Decimal::from(1000) / Decimal::from(baseline_span_ms);
        if baseline_rate <= Decimal::ZERO {
            return None;
        }
        let recent_rate = recent_sum * Decimal::from(1000) / Decimal::from(spike_window_ms);

        let ratio = recent_rate / baseline_rate;
        (ratio > self.config.volume_spike_multiple).then_some(ratio)
    }

    /// True when no cooldown entry blocks emitting `kind` for this asset
    fn cooldown_elapsed(&self, kind: AlertKind, asset_id: &str, now: DateTime<Utc>) -> bool {
        if self.config.alert_cooldown_ms == 0 {
            return true;
        }
        let window = Duration::milliseconds(self.config.alert_cooldown_ms as i64);
        match self.cooldowns.get(&(kind, asset_id.to_string())) {
            Some(last) if now - *last < window => {
                record_suppressed(kind);
                tracing::debug!(
                    kind = kind.as_str(),
                    asset = asset_id,
                    "alert suppressed by cooldown"
                );
                false
            }
            _ => true,
        }
    }

    fn emit(&mut self, mut alert: Alert) -> Alert {
        alert.market_title = self.titles.get(&alert.asset_id).cloned();
        self.cooldowns
            .insert((alert.kind, alert.asset_id.clone()), alert.timestamp);
        record_alert(alert.kind);
        tracing::info!(
            kind = alert.kind.as_str(),
            market = %alert.market,
            asset = %alert.asset_id,
            direction = ?alert.direction,
            magnitude = %alert.magnitude,
            reasoning = %alert.reasoning,
            "unusual activity detected"
        );
        alert
    }
}
