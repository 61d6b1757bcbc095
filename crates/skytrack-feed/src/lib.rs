//! # SkyTrack Feed
//!
//! Polls a local ADS-B receiver and publishes enriched aircraft snapshots.
//!
//! ## Components
//!
//! - **Client**: Fetches and decodes the receiver's `aircraft.json`, and
//!   probes a receiver address during setup
//! - **Enrichment**: Distance filtering, defaults and type classification
//! - **Poller**: Timer-driven, non-overlapping refresh loop that hands each
//!   snapshot to a [`SnapshotObserver`]
//! - **Metrics**: Poll, failure and aircraft counters

pub mod client;
pub mod enrich;
pub mod metrics;
pub mod poller;

pub use client::{parse_payload, probe_feed, FeedClient, FeedPayload, FeedProbe};
pub use enrich::{apply_distance_limit, build_snapshot, enrich};
pub use metrics::{FeedMetrics, FeedMetricsSnapshot};
pub use poller::{FeedPoller, PollerStatus, SnapshotObserver};
