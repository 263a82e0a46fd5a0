//! Dispatch counters
//!
//! Counters for records that reached a writer, records that fell into a
//! discard binding, and records that were lost to write or encode failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use leveled_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_written();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.written_count(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records handed to a writer successfully
    written_count: AtomicU64,

    /// Records sent to a level with no writer
    discarded_count: AtomicU64,

    /// Records a writer rejected with an error
    write_failures: AtomicU64,

    /// Records whose arguments could not be serialized
    encode_failures: AtomicU64,

    /// Successful reconfigurations
    reconfigurations: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            written_count: AtomicU64::new(0),
            discarded_count: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            encode_failures: AtomicU64::new(0),
            reconfigurations: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn written_count(&self) -> u64 {
        self.written_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn discarded_count(&self) -> u64 {
        self.discarded_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn encode_failures(&self) -> u64 {
        self.encode_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reconfigurations(&self) -> u64 {
        self.reconfigurations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_discarded(&self) -> u64 {
        self.discarded_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_encode_failure(&self) -> u64 {
        self.encode_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_reconfiguration(&self) -> u64 {
        self.reconfigurations.fetch_add(1, Ordering::Relaxed)
    }

    /// Records lost to write or encode failures
    pub fn lost_count(&self) -> u64 {
        self.write_failures() + self.encode_failures()
    }

    /// Failure rate as a percentage (0.0 - 100.0) of records that should have
    /// reached a writer.
    ///
    /// Returns 0.0 if nothing has been logged.
    pub fn failure_rate(&self) -> f64 {
        let lost = self.lost_count() as f64;
        let total = self.written_count() as f64 + lost;
        if total == 0.0 {
            0.0
        } else {
            (lost / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.written_count.store(0, Ordering::Relaxed);
        self.discarded_count.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.encode_failures.store(0, Ordering::Relaxed);
        self.reconfigurations.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            written_count: AtomicU64::new(self.written_count()),
            discarded_count: AtomicU64::new(self.discarded_count()),
            write_failures: AtomicU64::new(self.write_failures()),
            encode_failures: AtomicU64::new(self.encode_failures()),
            reconfigurations: AtomicU64::new(self.reconfigurations()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.written_count(), 0);
        assert_eq!(metrics.discarded_count(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.encode_failures(), 0);
        assert_eq!(metrics.reconfigurations(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_discarded(), 0);
        assert_eq!(metrics.discarded_count(), 1);
        metrics.record_discarded();
        assert_eq!(metrics.discarded_count(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..5 {
            metrics.record_write_failure();
            metrics.record_encode_failure();
        }

        assert_eq!(metrics.lost_count(), 10);
        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_discarded_not_counted_as_failure() {
        let metrics = LoggerMetrics::new();
        metrics.record_discarded();
        assert_eq!(metrics.failure_rate(), 0.0);
    }

    #[test]
    fn test_metrics_reset_and_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_written();
        metrics.record_reconfiguration();

        let snapshot = metrics.clone();
        metrics.reset();

        assert_eq!(metrics.written_count(), 0);
        assert_eq!(metrics.reconfigurations(), 0);
        assert_eq!(snapshot.written_count(), 1);
        assert_eq!(snapshot.reconfigurations(), 1);
    }
}
