//! Military aircraft registry.
//!
//! A remote reference document lists known airframes by ICAO hex code; the
//! registry keeps only the entries flagged as military. The document is
//! large, so downloads are cached for a day and never run concurrently.
//!
//! Lifecycle: `Empty -> Loading -> Loaded`, and `Loaded -> Loading` again
//! once the cache window has passed (or on a forced reload). A failed
//! download still produces a stored, empty map with a timestamp.

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use skytrack_core::config::RegistryConfig;
use skytrack_core::error::RegistryError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Flag value marking an entry as military.
pub const MILITARY_FLAG: &str = "10";

/// One military airframe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilitaryEntry {
    pub tail: String,
    pub type_code: String,
    pub flag: String,
    pub description: String,
}

/// Why an aircraft was classified as military.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionReason {
    /// The hex code is listed in the registry
    DatabaseMatch,
}

impl std::fmt::Display for DetectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionReason::DatabaseMatch => write!(f, "DATABASE_MATCH"),
        }
    }
}

/// Where the registry is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryPhase {
    Empty,
    Loading,
    Loaded,
}

/// Result of the most recent download attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum LoadOutcome {
    Loaded { entries: usize },
    Failed { reason: String },
}

/// Result of one `refresh` or `reload` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// A fresh document was downloaded and stored
    Loaded { entries: usize },
    /// The stored map is still inside its cache window
    Cached,
    /// Another load is already running
    InFlight,
    /// The download failed; an empty map was stored
    Failed { reason: String },
}

impl RefreshOutcome {
    /// True when a usable map is in place after the call.
    pub fn succeeded(&self) -> bool {
        matches!(self, RefreshOutcome::Loaded { .. } | RefreshOutcome::Cached)
    }
}

/// Point-in-time view of the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryStatus {
    pub phase: RegistryPhase,
    pub loaded: bool,
    pub size: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_updated_friendly: String,
    pub last_outcome: Option<LoadOutcome>,
}

#[derive(Debug)]
struct StoredMap {
    entries: HashMap<String, MilitaryEntry>,
    updated_at: DateTime<Utc>,
    stored: Instant,
    outcome: LoadOutcome,
}

/// Clears the in-progress flag when a load ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Remote, cached, single-flight military registry.
pub struct MilitaryRegistry {
    config: RegistryConfig,
    client: reqwest::Client,
    map: ArcSwapOption<StoredMap>,
    in_progress: AtomicBool,
    cancel: CancellationToken,
}

impl MilitaryRegistry {
    pub fn new(config: RegistryConfig, client: reqwest::Client) -> Self {
        Self {
            config,
            client,
            map: ArcSwapOption::empty(),
            in_progress: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        }
    }

    /// Whether the hex code belongs to a known military airframe.
    ///
    /// Never waits on the network. Before the first load this starts one in
    /// the background and answers `false`.
    pub fn is_military(self: &Arc<Self>, hex: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        match self.map.load_full() {
            Some(map) => map.entries.contains_key(&normalize_hex(hex)),
            None => {
                // Detached; the result lands in the map.
                if self.ensure_loaded().is_some() {
                    debug!(hex = %hex, "Military registry not loaded yet, started background load");
                }
                false
            }
        }
    }

    /// Classifies one aircraft, returning why it counts as military.
    ///
    /// Same loading behavior as [`MilitaryRegistry::is_military`].
    pub fn detect(self: &Arc<Self>, hex: &str) -> Option<Vec<DetectionReason>> {
        if hex.trim().is_empty() {
            return None;
        }
        self.is_military(hex).then(|| vec![DetectionReason::DatabaseMatch])
    }

    /// Entry details for a hex code, if it is military.
    pub fn lookup(&self, hex: &str) -> Option<MilitaryEntry> {
        self.map
            .load_full()
            .and_then(|map| map.entries.get(&normalize_hex(hex)).cloned())
    }

    /// Starts a background load unless a map is stored or a load is running.
    ///
    /// Outside a Tokio runtime nothing is started and the registry stays
    /// empty until a caller inside one asks again.
    pub fn ensure_loaded(self: &Arc<Self>) -> Option<JoinHandle<RefreshOutcome>> {
        if !self.config.enabled
            || self.cancel.is_cancelled()
            || self.map.load().is_some()
            || self.in_progress.load(Ordering::Acquire)
        {
            return None;
        }

        let Ok(runtime) = Handle::try_current() else {
            debug!("No Tokio runtime available, skipping military registry load");
            return None;
        };

        let registry = Arc::clone(self);
        Some(runtime.spawn(async move { registry.refresh().await }))
    }

    /// Downloads the registry unless the stored map is still fresh.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.load(false).await
    }

    /// Downloads the registry regardless of the cache window.
    pub async fn reload(&self) -> RefreshOutcome {
        self.load(true).await
    }

    async fn load(&self, force: bool) -> RefreshOutcome {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Military database load already in progress");
            return RefreshOutcome::InFlight;
        }
        let _guard = InFlightGuard(&self.in_progress);

        if !force && self.is_fresh() {
            debug!("Military database cache still valid");
            return RefreshOutcome::Cached;
        }

        info!(url = %self.config.url, "Loading military aircraft database");

        let result = tokio::select! {
            _ = self.cancel.cancelled() => Err(RegistryError::Cancelled),
            result = self.download() => result,
        };

        // Nothing touches state after shutdown.
        if self.cancel.is_cancelled() {
            debug!("Military database load abandoned after shutdown");
            return RefreshOutcome::Failed {
                reason: RegistryError::Cancelled.to_string(),
            };
        }

        match result {
            Ok(entries) => {
                let count = entries.len();
                self.store(entries, LoadOutcome::Loaded { entries: count });
                info!(entries = count, "Loaded military aircraft database");
                RefreshOutcome::Loaded { entries: count }
            }
            Err(e) => {
                match &e {
                    RegistryError::HttpStatus { status } => {
                        warn!(status, "Failed to load military database")
                    }
                    _ => error!(error = %e, "Error loading military database"),
                }
                let reason = e.to_string();
                self.store(HashMap::new(), LoadOutcome::Failed { reason: reason.clone() });
                RefreshOutcome::Failed { reason }
            }
        }
    }

    fn is_fresh(&self) -> bool {
        self.map
            .load_full()
            .map_or(false, |map| map.stored.elapsed() < self.config.cache_ttl())
    }

    fn store(&self, entries: HashMap<String, MilitaryEntry>, outcome: LoadOutcome) {
        self.map.store(Some(Arc::new(StoredMap {
            entries,
            updated_at: Utc::now(),
            stored: Instant::now(),
            outcome,
        })));
    }

    async fn download(&self) -> Result<HashMap<String, MilitaryEntry>, RegistryError> {
        let response = self
            .client
            .get(&self.config.url)
            .timeout(self.config.timeout())
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RegistryError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.map_request_error(e))?;
        parse_registry(&body)
    }

    fn map_request_error(&self, e: reqwest::Error) -> RegistryError {
        if e.is_timeout() {
            RegistryError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            RegistryError::Request { reason: e.to_string() }
        }
    }

    pub fn status(&self) -> RegistryStatus {
        let map = self.map.load_full();
        let phase = if self.in_progress.load(Ordering::Acquire) {
            RegistryPhase::Loading
        } else if map.is_some() {
            RegistryPhase::Loaded
        } else {
            RegistryPhase::Empty
        };

        match map {
            Some(map) => RegistryStatus {
                phase,
                loaded: true,
                size: map.entries.len(),
                last_updated: Some(map.updated_at),
                last_updated_friendly: map.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                last_outcome: Some(map.outcome.clone()),
            },
            None => RegistryStatus {
                phase,
                loaded: false,
                size: 0,
                last_updated: None,
                last_updated_friendly: "Database not loaded".to_string(),
                last_outcome: None,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.map.load_full().map_or(0, |map| map.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cancels any in-flight download. The registry does not load again afterwards.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        debug!("Military registry shut down");
    }
}

fn normalize_hex(hex: &str) -> String {
    hex.trim().to_uppercase()
}

/// Parses the registry document, keeping military entries only.
///
/// The document maps hex codes to `[tail, type, flag, description?]`.
/// Entries that are not arrays or have fewer than three elements are skipped.
pub fn parse_registry(body: &str) -> Result<HashMap<String, MilitaryEntry>, RegistryError> {
    let document: HashMap<String, serde_json::Value> =
        serde_json::from_str(body).map_err(|e| RegistryError::InvalidDocument { reason: e.to_string() })?;

    let field = |values: &[serde_json::Value], index: usize| -> String {
        values
            .get(index)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let entries = document
        .into_iter()
        .filter_map(|(hex, value)| {
            let values = value.as_array()?;
            if values.len() < 3 || values[2].as_str() != Some(MILITARY_FLAG) {
                return None;
            }
            Some((
                normalize_hex(&hex),
                MilitaryEntry {
                    tail: field(values, 0),
                    type_code: field(values, 1),
                    flag: MILITARY_FLAG.to_string(),
                    description: field(values, 3),
                },
            ))
        })
        .collect();

    Ok(entries)
}
