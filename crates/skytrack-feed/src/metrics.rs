//! Feed poller metrics
//!
//! Counters are exported through the `metrics` facade and mirrored in
//! atomics so status queries work without an installed recorder.

use metrics::{counter, describe_counter, describe_gauge, gauge};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Feed poller metrics collector
#[derive(Debug)]
pub struct FeedMetrics {
    polls: AtomicU64,
    failures: AtomicU64,
    aircraft_tracked: AtomicU64,
}

/// Point-in-time copy of the feed counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMetricsSnapshot {
    pub polls: u64,
    pub failures: u64,
    pub aircraft_tracked: u64,
}

impl FeedMetrics {
    pub fn new() -> Self {
        describe_counter!("skytrack_feed_polls_total", "Total feed polls attempted");
        describe_counter!("skytrack_feed_failures_total", "Total feed polls that failed");
        describe_gauge!("skytrack_aircraft_tracked", "Aircraft in the latest snapshot");

        Self {
            polls: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            aircraft_tracked: AtomicU64::new(0),
        }
    }

    pub fn record_poll(&self) {
        self.polls.fetch_add(1, Ordering::Relaxed);
        counter!("skytrack_feed_polls_total").increment(1);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        counter!("skytrack_feed_failures_total").increment(1);
    }

    pub fn record_aircraft(&self, count: usize) {
        self.aircraft_tracked.store(count as u64, Ordering::Relaxed);
        gauge!("skytrack_aircraft_tracked").set(count as f64);
    }

    pub fn snapshot(&self) -> FeedMetricsSnapshot {
        FeedMetricsSnapshot {
            polls: self.polls.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            aircraft_tracked: self.aircraft_tracked.load(Ordering::Relaxed),
        }
    }
}

impl Default for FeedMetrics {
    fn default() -> Self {
        Self::new()
    }
}
