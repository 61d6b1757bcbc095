//! Notification engine
//!
//! Runs once per published snapshot and turns changes between consecutive
//! snapshots into notifications:
//!
//! - **Military**: one notification per military hex that was not military
//!   in the previous snapshot
//! - **Proximity**: one notification whenever a different aircraft becomes
//!   the closest aircraft inside the distance and altitude thresholds
//! - **Emergency**: one notification per emergency squawk, every snapshot
//!
//! Dedup state lives only in memory and is replaced once per snapshot, after
//! that snapshot's notifications have been dispatched. Delivery failures are
//! logged and counted but never change the dedup state.

use crate::message::{MessageFormatter, Notification};
use crate::metrics::NotifyMetrics;
use crate::sink::NotificationSink;
use async_trait::async_trait;
use parking_lot::Mutex;
use skytrack_classify::MilitaryRegistry;
use skytrack_core::config::{NotificationConfig, ProximityConfig};
use skytrack_core::error::Result;
use skytrack_core::snapshot::Snapshot;
use skytrack_core::types::{AircraftRecord, EmergencySquawk};
use skytrack_feed::SnapshotObserver;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// What the engine remembers between snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupState {
    military: HashSet<String>,
    last_close: Option<String>,
}

impl DedupState {
    /// Hex codes classified as military in the previous snapshot.
    pub fn military(&self) -> &HashSet<String> {
        &self.military
    }

    /// Hex of the aircraft last reported as closest, if any.
    pub fn last_close(&self) -> Option<&str> {
        self.last_close.as_deref()
    }
}

/// Stateful notification trigger.
pub struct NotificationEngine {
    config: NotificationConfig,
    formatter: MessageFormatter,
    registry: Arc<MilitaryRegistry>,
    sink: Arc<dyn NotificationSink>,
    state: Mutex<DedupState>,
    metrics: NotifyMetrics,
}

impl NotificationEngine {
    pub fn new(
        config: NotificationConfig,
        external_url: impl Into<String>,
        registry: Arc<MilitaryRegistry>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let formatter = MessageFormatter::new(config.units, external_url);
        Self {
            config,
            formatter,
            registry,
            sink,
            state: Mutex::new(DedupState::default()),
            metrics: NotifyMetrics::new(),
        }
    }

    /// Evaluates a snapshot and dispatches the resulting notifications.
    ///
    /// Returns the number of notifications delivered. Does nothing when no
    /// target device is configured.
    pub async fn process(&self, snapshot: &Snapshot) -> usize {
        let Some(device) = self.config.target_device() else {
            return 0;
        };

        let previous = self.state.lock().clone();
        let (notifications, next) = self.evaluate(snapshot, &previous);

        let mut delivered = 0;
        for notification in &notifications {
            match self.sink.send(device, notification).await {
                Ok(()) => {
                    self.metrics.record_sent(notification.kind);
                    delivered += 1;
                }
                Err(e) => {
                    self.metrics.record_failed();
                    warn!(
                        device,
                        kind = %notification.kind,
                        hex = %notification.hex,
                        error = %e,
                        "Failed to send notification"
                    );
                }
            }
        }

        *self.state.lock() = next;

        if !notifications.is_empty() {
            debug!(
                planned = notifications.len(),
                delivered,
                aircraft = snapshot.len(),
                "Notification check complete"
            );
        }

        delivered
    }

    /// Computes this snapshot's notifications and the state to keep afterwards.
    fn evaluate(&self, snapshot: &Snapshot, previous: &DedupState) -> (Vec<Notification>, DedupState) {
        let aircraft = snapshot.aircraft();
        let mut notifications = Vec::new();
        let mut next = previous.clone();

        if self.config.military {
            let mut current = HashSet::new();
            for record in aircraft {
                let Some(reasons) = self.registry.detect(&record.hex) else {
                    continue;
                };
                if current.insert(record.hex.clone()) && !previous.military.contains(&record.hex) {
                    notifications.push(self.formatter.military(record, &reasons));
                }
            }
            next.military = current;
        }

        if self.config.proximity.enabled {
            match closest_low_aircraft(aircraft, &self.config.proximity) {
                Some(closest) => {
                    if previous.last_close.as_deref() != Some(closest.hex.as_str()) {
                        notifications.push(self.formatter.proximity(closest));
                        next.last_close = Some(closest.hex.clone());
                    }
                }
                None => next.last_close = None,
            }
        }

        if self.config.emergency {
            notifications.extend(
                emergencies(aircraft).map(|(record, squawk)| self.formatter.emergency(record, squawk)),
            );
        }

        (notifications, next)
    }

    /// Copy of the current dedup state.
    pub fn state(&self) -> DedupState {
        self.state.lock().clone()
    }

    pub fn metrics(&self) -> &NotifyMetrics {
        &self.metrics
    }
}

#[async_trait]
impl SnapshotObserver for NotificationEngine {
    async fn on_new_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.process(snapshot).await;
        Ok(())
    }
}

/// The closest aircraft inside the proximity thresholds.
///
/// Qualifies when `0 < distance <= distance_mi` and `altitude < altitude_ft`.
/// Ties go to the aircraft listed first.
pub fn closest_low_aircraft<'a>(
    aircraft: &'a [AircraftRecord],
    thresholds: &ProximityConfig,
) -> Option<&'a AircraftRecord> {
    aircraft
        .iter()
        .filter_map(|record| record.distance_mi.map(|d| (record, d)))
        .filter(|(record, d)| *d > 0.0 && *d <= thresholds.distance_mi && record.altitude_ft < thresholds.altitude_ft)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(record, _)| record)
}

/// Aircraft squawking an emergency code.
pub fn emergencies(aircraft: &[AircraftRecord]) -> impl Iterator<Item = (&AircraftRecord, EmergencySquawk)> {
    aircraft
        .iter()
        .filter_map(|record| record.emergency_squawk().map(|squawk| (record, squawk)))
}
