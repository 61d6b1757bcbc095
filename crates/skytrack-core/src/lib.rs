//! # SkyTrack Core
//!
//! Core types, error handling, and configuration for the SkyTrack ADS-B tracker.
//!
//! This crate provides the foundational building blocks shared by every other
//! SkyTrack crate:
//!
//! - **Types**: The raw receiver record (`RawAircraft`), the enriched
//!   `AircraftRecord` and the classification enums decoded from the type table.
//! - **Snapshot**: The ordered, per-cycle aircraft list published by the poller.
//! - **Errors**: Error types using `thiserror` for feed, registry, notification,
//!   setup and configuration failures.
//! - **Configuration**: YAML files with environment variable overrides and validation.
//!
//! ## Example
//!
//! ```
//! use skytrack_core::config::AppConfig;
//!
//! let config = AppConfig::from_yaml("feed:\n  host: adsb.local\n").unwrap();
//! assert_eq!(config.feed.aircraft_url(), "http://adsb.local:8085/data/aircraft.json");
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod error;
pub mod snapshot;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{AppConfig, UnitSystem};
pub use error::{Result, TrackerError};
pub use snapshot::{Snapshot, SnapshotSummary};
pub use types::{
    AircraftCategory, AircraftRecord, EmergencySquawk, EngineCount, EngineType, RawAircraft, RawAltitude,
    WeightClass,
};
