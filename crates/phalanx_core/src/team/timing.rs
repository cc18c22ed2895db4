//! # Region Timing
//!
//! Wall-clock instrumentation captured on every parallel region: one
//! duration per worker (that worker's time inside the region body) plus the
//! fork-to-join total on the initiating thread.

use std::time::Duration;

/// Timing report for the most recent parallel region.
#[derive(Debug, Clone)]
pub struct RegionTiming {
    per_worker: Vec<Duration>,
    total: Duration,
}

impl RegionTiming {
    pub(crate) fn new(per_worker: Vec<Duration>, total: Duration) -> Self {
        Self { per_worker, total }
    }

    /// Time worker `id` spent inside the region body, if `id` was part of
    /// the team.
    #[must_use]
    pub fn worker(&self, id: usize) -> Option<Duration> {
        self.per_worker.get(id).copied()
    }

    /// All per-worker durations, in worker-id order.
    #[must_use]
    pub fn workers(&self) -> &[Duration] {
        &self.per_worker
    }

    /// Fork-to-join wall time of the whole region.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_lookup() {
        let timing = RegionTiming::new(
            vec![Duration::from_millis(5), Duration::from_millis(7)],
            Duration::from_millis(9),
        );
        assert_eq!(timing.worker(1), Some(Duration::from_millis(7)));
        assert_eq!(timing.worker(2), None);
        assert_eq!(timing.workers().len(), 2);
        assert_eq!(timing.total(), Duration::from_millis(9));
    }
}
