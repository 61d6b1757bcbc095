//! Per-cycle aircraft snapshot.

use crate::types::AircraftRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The complete, ordered result of one feed poll.
///
/// Aircraft are sorted ascending by distance, with aircraft of unknown
/// distance after every aircraft of known distance. [`Snapshot::new`] is the
/// only constructor, so the ordering always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    aircraft: Vec<AircraftRecord>,
    /// Feed timestamp (`now`) of the poll
    pub last_update: Option<f64>,
    /// Receiver's total message counter
    pub total_messages: u64,
    /// Local time the snapshot was built
    pub fetched_at: DateTime<Utc>,
}

/// Short summary of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub aircraft_count: usize,
    pub closest_distance_mi: Option<f64>,
    pub closest_hex: Option<String>,
}

impl Snapshot {
    /// Builds a snapshot, sorting the aircraft by distance.
    pub fn new(mut aircraft: Vec<AircraftRecord>, last_update: Option<f64>, total_messages: u64) -> Self {
        aircraft.sort_by(|a, b| compare_distance(a.distance_mi, b.distance_mi));
        Self {
            aircraft,
            last_update,
            total_messages,
            fetched_at: Utc::now(),
        }
    }

    /// An empty snapshot
    pub fn empty() -> Self {
        Self::new(Vec::new(), None, 0)
    }

    pub fn aircraft(&self) -> &[AircraftRecord] {
        &self.aircraft
    }

    pub fn len(&self) -> usize {
        self.aircraft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aircraft.is_empty()
    }

    /// Closest aircraft with a known distance.
    pub fn closest(&self) -> Option<&AircraftRecord> {
        self.aircraft.first().filter(|a| a.distance_mi.is_some())
    }

    /// Finds an aircraft by hex code, ignoring case.
    pub fn find(&self, hex: &str) -> Option<&AircraftRecord> {
        self.aircraft.iter().find(|a| a.has_hex(hex))
    }

    /// The `n` closest aircraft.
    pub fn top(&self, n: usize) -> &[AircraftRecord] {
        &self.aircraft[..n.min(self.aircraft.len())]
    }

    pub fn summary(&self) -> SnapshotSummary {
        let closest = self.closest();
        SnapshotSummary {
            aircraft_count: self.aircraft.len(),
            closest_distance_mi: closest.and_then(|a| a.distance_mi),
            closest_hex: closest.map(|a| a.hex.clone()),
        }
    }
}

/// Orders known distances ascending and unknown distances last.
pub fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
