//! Bounded, time-ordered sample buffer for one metric

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

use super::types::Sample;

/// Time-bounded sample window
///
/// Holds samples in timestamp order; anything older than the span relative
/// to the newest sample is evicted on write. Bounded by time, not count, so
/// memory stays proportional to event rate times span.
#[derive(Debug, Clone)]
pub struct MetricWindow {
    samples: VecDeque<Sample>,
    span: Duration,
}

impl MetricWindow {
    /// Create an empty window covering the given span
    pub fn new(span: Duration) -> Self {
        Self {
            samples: VecDeque::new(),
            span,
        }
    }

    /// Append a sample and evict anything that fell out of the span
    ///
    /// An out-of-order sample (older than the newest one held) is dropped;
    /// the adapter guarantees per-asset ordering, so this only absorbs
    /// transport replays.
    pub fn push(&mut self, sample: Sample) {
        if let Some(last) = self.samples.back() {
            if sample.timestamp < last.timestamp {
                tracing::debug!(
                    ts = %sample.timestamp,
                    last = %last.timestamp,
                    "dropping out-of-order sample"
                );
                return;
            }
        }
        self.samples.push_back(sample);

        let cutoff = sample.timestamp - self.span;
        while let Some(front) = self.samples.front() {
            if front.timestamp < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest sample in the window
    pub fn first(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Newest sample in the window
    pub fn last(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Sample at position `i`, oldest first
    pub fn get(&self, i: usize) -> Option<&Sample> {
        self.samples.get(i)
    }

    /// Iterate samples oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Timestamp of the newest sample
    pub fn newest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.samples.back().map(|s| s.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_push_keeps_order() {
        let mut window = MetricWindow::new(Duration::seconds(60));
        window.push(Sample::new(dec!(1), ts(0)));
        window.push(Sample::new(dec!(2), ts(1)));
        window.push(Sample::new(dec!(3), ts(2)));
        assert_eq!(window.len(), 3);
        assert_eq!(window.first().unwrap().value, dec!(1));
        assert_eq!(window.last().unwrap().value, dec!(3));
    }

    #[test]
    fn test_push_evicts_over_age_samples() {
        let mut window = MetricWindow::new(Duration::seconds(10));
        for i in 0..5 {
            window.push(Sample::new(dec!(1), ts(i)));
        }
        assert_eq!(window.len(), 5);

        window.push(Sample::new(dec!(1), ts(30)));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_push_drops_out_of_order_sample() {
        let mut window = MetricWindow::new(Duration::seconds(60));
        window.push(Sample::new(dec!(1), ts(10)));
        window.push(Sample::new(dec!(2), ts(5)));
        assert_eq!(window.len(), 1);
        assert_eq!(window.last().unwrap().value, dec!(1));
    }

    #[test]
    fn test_equal_timestamps_are_kept() {
        let mut window = MetricWindow::new(Duration::seconds(60));
        window.push(Sample::new(dec!(1), ts(0)));
        window.push(Sample::new(dec!(2), ts(0)));
        assert_eq!(window.len(), 2);
    }
}
