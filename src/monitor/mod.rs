//! Market velocity monitor module
//!
//! Per-market facade over price and volume velocity tracking. Separating the
//! two lets callers distinguish "price moving fast" (momentum) from "trading
//! activity surging" (liquidity events).

mod monitor;
mod types;

pub use monitor::MarketVelocityMonitor;
pub use types::{MarketState, OverallState};
