//! Report types returned by the manual tracker operations.
//!
//! Every report serializes to the JSON the CLI prints.

use serde::{Deserialize, Serialize};
use skytrack_classify::{DetectionReason, MilitaryEntry, RegistryStatus};
use skytrack_core::types::AircraftRecord;
use skytrack_feed::{FeedMetricsSnapshot, PollerStatus};
use skytrack_notify::NotifyMetricsSnapshot;

/// Reported when no poll has succeeded yet.
pub const NO_DATA: &str = "No aircraft data available";

/// How military aircraft are detected.
pub const DETECTION_METHOD: &str = "database_only";

/// The fields of a tracked aircraft worth showing on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftSummary {
    pub hex: String,
    pub tail: String,
    pub flight: Option<String>,
    pub distance_mi: Option<f64>,
    pub altitude_ft: i64,
    pub speed_kts: f64,
    pub heading: Option<f64>,
    pub aircraft_type: Option<String>,
    pub description: String,
    pub operator: Option<String>,
    pub squawk: Option<String>,
    pub emergency: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&AircraftRecord> for AircraftSummary {
    fn from(record: &AircraftRecord) -> Self {
        Self {
            hex: record.hex.clone(),
            tail: record.tail.clone(),
            flight: record.flight.clone(),
            distance_mi: record.distance_mi,
            altitude_ft: record.altitude_ft,
            speed_kts: record.speed_kts,
            heading: record.heading,
            aircraft_type: record.aircraft_type.clone(),
            description: record.description.clone(),
            operator: record.operator.clone(),
            squawk: record.squawk.clone(),
            emergency: record.emergency.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
        }
    }
}

/// Result of looking one aircraft up by hex code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftDetails {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<AircraftSummary>,
    /// Registry entry, when the aircraft is a known military airframe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub military: Option<MilitaryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AircraftDetails {
    pub fn found(record: &AircraftRecord, military: Option<MilitaryEntry>) -> Self {
        Self {
            found: true,
            aircraft: Some(AircraftSummary::from(record)),
            military,
            error: None,
        }
    }

    pub fn not_found(hex: &str) -> Self {
        Self::error(format!("Aircraft with hex code {} not found", hex))
    }

    pub fn no_data() -> Self {
        Self::error(NO_DATA)
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            found: false,
            aircraft: None,
            military: None,
            error: Some(message.into()),
        }
    }
}

/// One military aircraft in a [`MilitaryReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilitaryAircraft {
    pub hex: String,
    pub tail: String,
    pub flight: Option<String>,
    pub distance_mi: Option<f64>,
    pub detection_reasons: Vec<DetectionReason>,
    pub description: String,
}

/// Military classification of the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilitaryReport {
    pub total_aircraft: usize,
    pub military_detected: usize,
    pub detection_method: String,
    pub military_aircraft: Vec<MilitaryAircraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MilitaryReport {
    pub fn new(total_aircraft: usize, military_aircraft: Vec<MilitaryAircraft>) -> Self {
        Self {
            total_aircraft,
            military_detected: military_aircraft.len(),
            detection_method: DETECTION_METHOD.to_string(),
            military_aircraft,
            error: None,
        }
    }

    pub fn no_data() -> Self {
        Self {
            error: Some(NO_DATA.to_string()),
            ..Self::new(0, Vec::new())
        }
    }
}

/// Result of a forced registry download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadReport {
    pub success: bool,
    pub database_size: usize,
    pub message: String,
}

impl ReloadReport {
    pub fn new(success: bool, database_size: usize) -> Self {
        let message = if success {
            "Database loaded successfully"
        } else {
            "Database load failed"
        };
        Self {
            success,
            database_size,
            message: message.to_string(),
        }
    }
}

/// Everything a status query reports about a running tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerStatus {
    pub poller: PollerStatus,
    pub registry: RegistryStatus,
    pub feed: FeedMetricsSnapshot,
    pub notifications: NotifyMetricsSnapshot,
}
