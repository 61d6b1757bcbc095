//! Tracker facade
//!
//! Wires the type table, military registry, feed poller and notification
//! engine together and exposes the manual operations. One tracker owns one
//! registry; after [`Tracker::shutdown`] it does not start again.

use crate::report::{AircraftDetails, MilitaryAircraft, MilitaryReport, ReloadReport, TrackerStatus};
use skytrack_classify::{MilitaryRegistry, RefreshOutcome, RegistryStatus, TypeLookup};
use skytrack_core::config::AppConfig;
use skytrack_core::error::{Result, SetupError, TrackerError};
use skytrack_core::snapshot::{Snapshot, SnapshotSummary};
use skytrack_feed::{probe_feed, FeedPoller, FeedProbe, PollerStatus};
use skytrack_notify::{sink_for, NotificationEngine, NotificationSink};
use std::sync::Arc;
use tracing::{info, warn};

/// User agent sent with every outgoing request.
pub const USER_AGENT: &str = concat!("skytrack/", env!("CARGO_PKG_VERSION"));

/// The assembled tracker.
pub struct Tracker {
    config: AppConfig,
    http: reqwest::Client,
    types: Arc<TypeLookup>,
    registry: Arc<MilitaryRegistry>,
    engine: Arc<NotificationEngine>,
    poller: Arc<FeedPoller>,
}

impl Tracker {
    /// Builds a tracker with the sink chosen by the notification settings.
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TrackerError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        let sink = sink_for(&config.notifications, http.clone());
        Self::with_sink(config, http, sink)
    }

    /// Builds a tracker that delivers notifications through `sink`.
    ///
    /// Fails with [`TrackerError::Config`] when the configuration does not validate.
    pub fn with_sink(config: AppConfig, http: reqwest::Client, sink: Arc<dyn NotificationSink>) -> Result<Self> {
        config.validate()?;

        let types = Arc::new(TypeLookup::load(&config.type_db));
        let registry = Arc::new(MilitaryRegistry::new(config.registry.clone(), http.clone()));

        let engine = Arc::new(NotificationEngine::new(
            config.notifications.clone(),
            config.external_url(),
            Arc::clone(&registry),
            sink,
        ));

        let poller = Arc::new(
            FeedPoller::new(config.feed.clone(), http.clone(), Arc::clone(&types))
                .with_registry(Arc::clone(&registry))
                .with_observer(engine.clone()),
        );

        if config.notifications.target_device().is_none() {
            info!("No notification device configured, notifications disabled");
        }

        Ok(Self {
            config,
            http,
            types,
            registry,
            engine,
            poller,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeLookup {
        &self.types
    }

    pub fn registry(&self) -> &Arc<MilitaryRegistry> {
        &self.registry
    }

    pub fn engine(&self) -> &NotificationEngine {
        &self.engine
    }

    /// Starts periodic polling and the initial registry download.
    pub fn start(&self) {
        info!(
            feed = %self.config.feed.aircraft_url(),
            interval_secs = self.config.feed.update_interval_secs,
            "Starting tracker"
        );
        self.poller.start();
    }

    /// Stops polling and abandons any registry download in flight.
    pub async fn shutdown(&self) {
        self.poller.stop().await;
        self.registry.shutdown();
        info!("Tracker shut down");
    }

    /// Checks that the configured feed answers with aircraft data.
    pub async fn check_feed(&self) -> std::result::Result<FeedProbe, SetupError> {
        probe_feed(&self.http, &self.config.feed).await
    }

    /// Polls the feed immediately, outside the regular schedule.
    pub async fn refresh_now(&self) -> Result<SnapshotSummary> {
        info!("Manual refresh requested");
        let snapshot = self.poller.refresh().await?;
        Ok(snapshot.summary())
    }

    /// Downloads the registry unless the stored copy is still fresh.
    pub async fn refresh_military_database(&self) -> RefreshOutcome {
        self.registry.refresh().await
    }

    /// Downloads the registry now, ignoring the cache window.
    pub async fn reload_military_database(&self) -> ReloadReport {
        info!("Manual military database load requested");
        let outcome = self.registry.reload().await;
        if let RefreshOutcome::Failed { reason } = &outcome {
            warn!(reason = %reason, "Manual military database load failed");
        }
        ReloadReport::new(outcome.succeeded(), self.registry.len())
    }

    /// Looks one aircraft up in the latest snapshot.
    pub fn aircraft_details(&self, hex: &str) -> AircraftDetails {
        let Some(snapshot) = self.poller.snapshot().filter(|s| !s.is_empty()) else {
            return AircraftDetails::no_data();
        };

        match snapshot.find(hex) {
            Some(record) => AircraftDetails::found(record, self.registry.lookup(&record.hex)),
            None => AircraftDetails::not_found(&hex.trim().to_lowercase()),
        }
    }

    /// Classifies every aircraft in the latest snapshot.
    pub fn military_report(&self) -> MilitaryReport {
        let Some(snapshot) = self.poller.snapshot().filter(|s| !s.is_empty()) else {
            return MilitaryReport::no_data();
        };

        let military: Vec<MilitaryAircraft> = snapshot
            .aircraft()
            .iter()
            .filter_map(|record| {
                let reasons = self.registry.detect(&record.hex)?;
                Some(MilitaryAircraft {
                    hex: record.hex.clone(),
                    tail: record.tail.clone(),
                    flight: record.flight.clone(),
                    distance_mi: record.distance_mi,
                    detection_reasons: reasons,
                    description: record.description.clone(),
                })
            })
            .collect();

        info!(
            military = military.len(),
            total = snapshot.len(),
            "Military detection report"
        );

        MilitaryReport::new(snapshot.len(), military)
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.poller.snapshot()
    }

    pub fn poller_status(&self) -> PollerStatus {
        self.poller.status()
    }

    pub fn registry_status(&self) -> RegistryStatus {
        self.registry.status()
    }

    pub fn status(&self) -> TrackerStatus {
        TrackerStatus {
            poller: self.poller.status(),
            registry: self.registry.status(),
            feed: self.poller.metrics().snapshot(),
            notifications: self.engine.metrics().snapshot(),
        }
    }
}
