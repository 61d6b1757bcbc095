//! Notification metrics

use crate::message::NotificationKind;
use metrics::{counter, describe_counter};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Notification metrics collector
#[derive(Debug)]
pub struct NotifyMetrics {
    military_sent: AtomicU64,
    proximity_sent: AtomicU64,
    emergency_sent: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of the notification counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyMetricsSnapshot {
    pub military_sent: u64,
    pub proximity_sent: u64,
    pub emergency_sent: u64,
    pub failed: u64,
}

impl NotifyMetricsSnapshot {
    pub fn total_sent(&self) -> u64 {
        self.military_sent + self.proximity_sent + self.emergency_sent
    }
}

impl NotifyMetrics {
    pub fn new() -> Self {
        describe_counter!(
            "skytrack_notifications_sent_total",
            "Notifications delivered, by kind"
        );
        describe_counter!(
            "skytrack_notifications_failed_total",
            "Notifications the sink failed to deliver"
        );

        Self {
            military_sent: AtomicU64::new(0),
            proximity_sent: AtomicU64::new(0),
            emergency_sent: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn record_sent(&self, kind: NotificationKind) {
        let mirror = match kind {
            NotificationKind::Military => &self.military_sent,
            NotificationKind::Proximity => &self.proximity_sent,
            NotificationKind::Emergency => &self.emergency_sent,
        };
        mirror.fetch_add(1, Ordering::Relaxed);
        counter!("skytrack_notifications_sent_total", "kind" => kind.as_str()).increment(1);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        counter!("skytrack_notifications_failed_total").increment(1);
    }

    pub fn snapshot(&self) -> NotifyMetricsSnapshot {
        NotifyMetricsSnapshot {
            military_sent: self.military_sent.load(Ordering::Relaxed),
            proximity_sent: self.proximity_sent.load(Ordering::Relaxed),
            emergency_sent: self.emergency_sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for NotifyMetrics {
    fn default() -> Self {
        Self::new()
    }
}
