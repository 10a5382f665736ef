//! poly-activity: streaming unusual-activity detection for prediction markets
//!
//! This library provides the core components for:
//! - Bounded time-windowed metric buffers with rate-of-change math
//! - Per-market velocity monitoring (price vs volume)
//! - Four streaming anomaly rules: flash moves, whale trades, volume
//!   spikes, and order-book imbalance
//! - Debounced alerting with per-market cooldowns
//! - Structured logging and metrics
//!
//! The engine is synchronous and in-process: the transport that produces
//! normalized events and the collaborator that delivers alerts live outside
//! this crate.

pub mod config;
pub mod detector;
pub mod events;
pub mod monitor;
pub mod telemetry;
pub mod velocity;
