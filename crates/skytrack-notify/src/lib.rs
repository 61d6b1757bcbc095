//! # SkyTrack Notify
//!
//! Turns successive aircraft snapshots into user notifications.
//!
//! ## Features
//!
//! - Military aircraft arrival detection backed by the military registry
//! - Close, low aircraft alerts with per-aircraft deduplication
//! - Emergency squawk (7500/7600/7700) alerts on every snapshot
//! - Pluggable delivery through [`NotificationSink`]: webhook or log
//! - Per-kind delivery counters

pub mod engine;
pub mod message;
pub mod metrics;
pub mod sink;

pub use engine::{closest_low_aircraft, emergencies, DedupState, NotificationEngine};
pub use message::{format_thousands, trend_arrow, MessageFormatter, Notification, NotificationKind, Priority};
pub use metrics::{NotifyMetrics, NotifyMetricsSnapshot};
pub use sink::{sink_for, LogSink, NotificationSink, WebhookSink};
