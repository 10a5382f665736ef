//! Configuration types for poly-activity
//!
//! Every threshold the anomaly rules consult lives here, with serde defaults
//! so a partial TOML file (or none at all) yields a working engine.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Config file is not valid TOML
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub velocity: VelocityConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Velocity tracker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VelocityConfig {
    /// Time span of each metric window (milliseconds)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Minimum samples before a window yields metrics
    #[serde(default = "default_min_data_points")]
    pub min_data_points: usize,

    /// Multiple of the baseline step velocity that flags a sample as unusual
    #[serde(default = "default_unusual_multiple")]
    pub unusual_multiple: Decimal,

    /// Velocity-magnitude change below this is classified as steady
    #[serde(default = "default_steady_epsilon")]
    pub steady_epsilon: Decimal,
}

fn default_window_ms() -> u64 {
    60_000
}
fn default_min_data_points() -> usize {
    3
}
fn default_unusual_multiple() -> Decimal {
    Decimal::from(3)
}
fn default_steady_epsilon() -> Decimal {
    Decimal::new(1, 4) // 0.0001
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            min_data_points: 3,
            unusual_multiple: Decimal::from(3),
            steady_epsilon: Decimal::new(1, 4),
        }
    }
}

/// Unusual activity detector configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Minimum elapsed time between two alerts of the same kind for the
    /// same asset (milliseconds); 0 disables suppression
    #[serde(default = "default_alert_cooldown_ms")]
    pub alert_cooldown_ms: u64,

    /// Minimum absolute price change (percent) for a flash-move alert
    #[serde(default = "default_flash_move_threshold_pct")]
    pub flash_move_threshold_pct: Decimal,

    /// Retention span for per-asset price history (milliseconds)
    #[serde(default = "default_flash_move_window_ms")]
    pub flash_move_window_ms: u64,

    /// Minimum trade notional (price * size) for a whale-entry alert
    #[serde(default = "default_whale_notional_threshold")]
    pub whale_notional_threshold: Decimal,

    /// Recent volume rate must exceed baseline rate by this multiple
    #[serde(default = "default_volume_spike_multiple")]
    pub volume_spike_multiple: Decimal,

    /// Full trade-history window used for the volume baseline (milliseconds)
    #[serde(default = "default_volume_window_ms")]
    pub volume_window_ms: u64,

    /// Trailing sub-window compared against the baseline (milliseconds)
    #[serde(default = "default_volume_spike_window_ms")]
    pub volume_spike_window_ms: u64,

    /// Larger-side / smaller-side resting size ratio for an imbalance alert
    #[serde(default = "default_orderbook_imbalance_ratio")]
    pub orderbook_imbalance_ratio: Decimal,

    /// Minimum baseline trades before the volume-spike rule may fire
    #[serde(default = "default_min_data_points")]
    pub min_data_points: usize,
}

fn default_alert_cooldown_ms() -> u64 {
    60_000
}
fn default_flash_move_threshold_pct() -> Decimal {
    Decimal::from(5) // 5%
}
fn default_flash_move_window_ms() -> u64 {
    30_000
}
fn default_whale_notional_threshold() -> Decimal {
    Decimal::from(5_000) // $5,000
}
fn default_volume_spike_multiple() -> Decimal {
    Decimal::from(3)
}
fn default_volume_window_ms() -> u64 {
    60_000
}
fn default_volume_spike_window_ms() -> u64 {
    10_000
}
fn default_orderbook_imbalance_ratio() -> Decimal {
    Decimal::from(3)
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            alert_cooldown_ms: 60_000,
            flash_move_threshold_pct: Decimal::from(5),
            flash_move_window_ms: 30_000,
            whale_notional_threshold: Decimal::from(5_000),
            volume_spike_multiple: Decimal::from(3),
            volume_window_ms: 60_000,
            volume_spike_window_ms: 10_000,
            orderbook_imbalance_ratio: Decimal::from(3),
            min_data_points: 3,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject threshold combinations that would make every rule dead
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.velocity.min_data_points < 2 {
            return Err(ConfigError::Invalid(
                "velocity.min_data_points must be at least 2".to_string(),
            ));
        }
        if self.velocity.unusual_multiple <= Decimal::ZERO {
            return Err(ConfigError::Invalid(
                "velocity.unusual_multiple must be positive".to_string(),
            ));
        }
        if self.detector.volume_spike_window_ms >= self.detector.volume_window_ms {
            return Err(ConfigError::Invalid(
                "detector.volume_spike_window_ms must be shorter than volume_window_ms".to_string(),
            ));
        }
        if self.detector.orderbook_imbalance_ratio <= Decimal::ONE {
            return Err(ConfigError::Invalid(
                "detector.orderbook_imbalance_ratio must exceed 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.velocity.window_ms, 60_000);
        assert_eq!(config.velocity.min_data_points, 3);
        assert_eq!(config.detector.flash_move_threshold_pct, dec!(5));
        assert_eq!(config.detector.whale_notional_threshold, dec!(5000));
        assert_eq!(config.detector.alert_cooldown_ms, 60_000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [velocity]
            window_ms = 30000
            min_data_points = 5
            unusual_multiple = 2.5

            [detector]
            alert_cooldown_ms = 0
            flash_move_threshold_pct = 10
            whale_notional_threshold = 10000.0

            [telemetry]
            log_level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.velocity.window_ms, 30_000);
        assert_eq!(config.velocity.min_data_points, 5);
        assert_eq!(config.velocity.unusual_multiple, dec!(2.5));
        assert_eq!(config.detector.alert_cooldown_ms, 0);
        assert_eq!(config.detector.flash_move_threshold_pct, dec!(10));
        assert_eq!(config.detector.whale_notional_threshold, dec!(10000));
        // Unset fields fall back to defaults
        assert_eq!(config.detector.volume_window_ms, 60_000);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.detector.orderbook_imbalance_ratio, dec!(3));
    }

    #[test]
    fn test_validate_rejects_single_point_windows() {
        let mut config = Config::default();
        config.velocity.min_data_points = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_volume_windows() {
        let mut config = Config::default();
        config.detector.volume_spike_window_ms = config.detector.volume_window_ms;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
