//! Feed Poller
//!
//! Periodically fetches the receiver's aircraft list, enriches it and
//! publishes an immutable [`Snapshot`]. Each published snapshot is handed to
//! an optional [`SnapshotObserver`] before the next poll can start.
//!
//! Polls never overlap: the timer loop and manual refreshes share one async
//! lock. A failed poll keeps the previous snapshot and marks the feed
//! unavailable until the next successful poll.

use crate::client::FeedClient;
use crate::enrich::build_snapshot;
use crate::metrics::FeedMetrics;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use skytrack_classify::{MilitaryRegistry, TypeLookup};
use skytrack_core::config::FeedConfig;
use skytrack_core::error::Result;
use skytrack_core::snapshot::Snapshot;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Receives every snapshot the poller publishes.
#[async_trait]
pub trait SnapshotObserver: Send + Sync {
    /// Called once per successful poll, after the snapshot is published.
    async fn on_new_snapshot(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Poller health as seen by status queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollerStatus {
    /// False after a failed poll until the next success
    pub available: bool,
    pub running: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u64,
    pub aircraft_count: usize,
}

/// Periodic feed poller.
pub struct FeedPoller {
    config: FeedConfig,
    client: FeedClient,
    types: Arc<TypeLookup>,
    registry: Option<Arc<MilitaryRegistry>>,
    observer: Option<Arc<dyn SnapshotObserver>>,
    snapshot: ArcSwapOption<Snapshot>,
    refresh_lock: tokio::sync::Mutex<()>,
    status: RwLock<PollerStatus>,
    metrics: FeedMetrics,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FeedPoller {
    pub fn new(config: FeedConfig, http: reqwest::Client, types: Arc<TypeLookup>) -> Self {
        let client = FeedClient::new(&config, http);
        Self {
            config,
            client,
            types,
            registry: None,
            observer: None,
            snapshot: ArcSwapOption::empty(),
            refresh_lock: tokio::sync::Mutex::new(()),
            status: RwLock::new(PollerStatus::default()),
            metrics: FeedMetrics::new(),
            cancel: CancellationToken::new(),
            task: Mutex::new(None),
        }
    }

    /// Registry to warm up when polling starts.
    pub fn with_registry(mut self, registry: Arc<MilitaryRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Observer that receives each new snapshot.
    pub fn with_observer(mut self, observer: Arc<dyn SnapshotObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Polls the receiver once and publishes the result.
    ///
    /// Waits for any poll already in progress. Observer failures are logged
    /// and do not fail the poll.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        let _guard = self.refresh_lock.lock().await;
        self.metrics.record_poll();

        let payload = match self.client.fetch().await {
            Ok(payload) => payload,
            Err(e) => {
                self.metrics.record_failure();
                let consecutive_failures = {
                    let mut status = self.status.write();
                    status.available = false;
                    status.last_error = Some(e.to_string());
                    status.consecutive_failures += 1;
                    status.consecutive_failures
                };
                warn!(
                    url = %self.client.url(),
                    error = %e,
                    consecutive_failures,
                    "Feed poll failed, keeping previous snapshot"
                );
                return Err(e.into());
            }
        };

        let snapshot = Arc::new(build_snapshot(payload, &self.types, self.config.distance_limit_mi));
        self.snapshot.store(Some(Arc::clone(&snapshot)));
        self.metrics.record_aircraft(snapshot.len());

        {
            let mut status = self.status.write();
            status.available = true;
            status.last_success = Some(snapshot.fetched_at);
            status.last_error = None;
            status.consecutive_failures = 0;
            status.aircraft_count = snapshot.len();
        }

        debug!(
            aircraft = snapshot.len(),
            messages = snapshot.total_messages,
            "Published aircraft snapshot"
        );

        if let Some(observer) = &self.observer {
            if let Err(e) = observer.on_new_snapshot(&snapshot).await {
                error!(error = %e, "Snapshot observer failed");
            }
        }

        Ok(snapshot)
    }

    /// The most recently published snapshot, if any poll has succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.load_full()
    }

    pub fn status(&self) -> PollerStatus {
        let mut status = self.status.read().clone();
        status.running = self.is_running();
        status
    }

    pub fn metrics(&self) -> &FeedMetrics {
        &self.metrics
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Starts the polling loop. The first poll runs immediately.
    pub fn start(self: &Arc<Self>) {
        let mut task = self.task.lock();
        if task.is_some() {
            debug!("Feed poller already running");
            return;
        }

        if let Some(registry) = &self.registry {
            // Detached; the registry records its own outcome.
            let _ = registry.ensure_loaded();
        }

        let poller = Arc::clone(self);
        let cancel = self.cancel.clone();
        let interval = self.config.update_interval();

        *task = Some(tokio::spawn(async move {
            info!(
                url = %poller.client.url(),
                interval_secs = interval.as_secs(),
                "Feed poller started"
            );

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            // Failures are logged and recorded in the status.
                            _ = poller.refresh() => {}
                        }
                    }
                }
            }

            debug!("Feed poller loop exited");
        }));
    }

    /// Stops the polling loop, abandoning any poll in progress.
    pub async fn stop(&self) {
        self.cancel.cancel();
        let task = self.task.lock().take();
        if let Some(task) = task {
            let _ = task.await;
        }
        info!("Feed poller stopped");
    }
}
