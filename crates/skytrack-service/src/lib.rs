//! # SkyTrack Service
//!
//! The assembled tracker and its manual operations.
//!
//! ## Components
//!
//! - **Tracker**: Builds the type table, military registry, feed poller and
//!   notification engine from an [`AppConfig`](skytrack_core::AppConfig) and
//!   owns their lifecycle
//! - **Reports**: Serializable results of aircraft lookups, military
//!   detection, registry reloads and status queries

pub mod report;
pub mod tracker;

pub use report::{
    AircraftDetails, AircraftSummary, MilitaryAircraft, MilitaryReport, ReloadReport, TrackerStatus,
};
pub use tracker::{Tracker, USER_AGENT};
