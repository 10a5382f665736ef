//! Velocity tracking module
//!
//! Bounded time-windowed sample buffers plus the rate-of-change math the
//! anomaly rules build on: velocity, acceleration, and baseline deviation.

mod tracker;
mod types;
mod window;

pub use tracker::VelocityTracker;
pub use types::{MetricKey, MetricKind, Sample, VelocityDirection, VelocityMetrics};
pub use window::MetricWindow;
