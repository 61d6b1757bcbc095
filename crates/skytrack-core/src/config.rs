//! Configuration management for the SkyTrack aircraft tracker.
//!
//! This module provides the configuration system that supports:
//! - Loading from YAML files
//! - Environment variable overrides (`SKYTRACK__FEED__HOST=...`)
//! - Validation of all settings
//! - Feed, military registry, type table, notification, logging and metrics settings

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

/// Smallest accepted polling interval.
pub const MIN_UPDATE_INTERVAL_SECS: u64 = 5;
/// Largest accepted polling interval.
pub const MAX_UPDATE_INTERVAL_SECS: u64 = 300;
/// Largest accepted distance limit, in miles.
pub const MAX_DISTANCE_LIMIT_MI: f64 = 1000.0;

/// Default location of the military aircraft reference document.
pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/Mictronics/readsb-protobuf/dev/webapp/src/db/aircrafts.json";

/// Main application configuration.
///
/// # Examples
///
/// ```no_run
/// use skytrack_core::config::AppConfig;
///
/// let config = AppConfig::from_file("skytrack.yaml").unwrap();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Local ADS-B feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Remote military registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Aircraft type table settings
    #[serde(default)]
    pub type_db: TypeDbConfig,

    /// Notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&contents)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Loads configuration using the `config` crate, layering the file with
    /// `SKYTRACK__*` environment variable overrides.
    pub fn from_config_builder<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(
                config::Environment::with_prefix("SKYTRACK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        config.try_deserialize().map_err(|e| {
            ConfigError::InvalidFormat {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        self.feed.validate()?;
        self.registry.validate()?;
        self.notifications.validate()?;
        self.logging.parse_level()?;
        Ok(())
    }

    /// Base URL used for notification deep links.
    ///
    /// Falls back to the feed's own web interface when no external URL is set.
    pub fn external_url(&self) -> String {
        match self.notifications.external_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.feed.base_url(),
        }
    }
}

/// Local ADS-B feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Receiver host name or address
    #[serde(default = "default_feed_host")]
    pub host: String,

    /// Receiver web port
    #[serde(default = "default_feed_port")]
    pub port: u16,

    /// Seconds between polls
    #[serde(default = "default_update_interval")]
    pub update_interval_secs: u64,

    /// Drop aircraft further away than this many miles (0 = unlimited)
    #[serde(default)]
    pub distance_limit_mi: f64,

    /// Request timeout in seconds
    #[serde(default = "default_feed_timeout")]
    pub timeout_secs: u64,
}

fn default_feed_host() -> String {
    "localhost".to_string()
}

fn default_feed_port() -> u16 {
    8085
}

fn default_update_interval() -> u64 {
    10
}

fn default_feed_timeout() -> u64 {
    10
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            host: default_feed_host(),
            port: default_feed_port(),
            update_interval_secs: default_update_interval(),
            distance_limit_mi: 0.0,
            timeout_secs: default_feed_timeout(),
        }
    }
}

impl FeedConfig {
    /// Validates the feed configuration.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::missing_field("feed.host").into());
        }

        if self.port == 0 {
            return Err(ConfigError::invalid_value("feed.port", "Port cannot be 0").into());
        }

        if !(MIN_UPDATE_INTERVAL_SECS..=MAX_UPDATE_INTERVAL_SECS).contains(&self.update_interval_secs) {
            return Err(ConfigError::invalid_value(
                "feed.update_interval_secs",
                format!(
                    "must be between {} and {} seconds",
                    MIN_UPDATE_INTERVAL_SECS, MAX_UPDATE_INTERVAL_SECS
                ),
            )
            .into());
        }

        if !(0.0..=MAX_DISTANCE_LIMIT_MI).contains(&self.distance_limit_mi) {
            return Err(ConfigError::invalid_value(
                "feed.distance_limit_mi",
                format!("must be between 0 and {}", MAX_DISTANCE_LIMIT_MI),
            )
            .into());
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid_value("feed.timeout_secs", "Timeout cannot be 0").into());
        }

        Ok(())
    }

    /// Returns the receiver's web interface root.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Returns the aircraft listing URL.
    pub fn aircraft_url(&self) -> String {
        format!("{}/data/aircraft.json", self.base_url())
    }

    /// Returns the polling interval as a Duration.
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    /// Returns the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Remote military registry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Whether military classification is enabled at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Registry document URL
    #[serde(default = "default_registry_url")]
    pub url: String,

    /// Hours a downloaded registry stays valid
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Download timeout in seconds
    #[serde(default = "default_registry_timeout")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_registry_timeout() -> u64 {
    60
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_registry_url(),
            cache_ttl_hours: default_cache_ttl_hours(),
            timeout_secs: default_registry_timeout(),
        }
    }
}

impl RegistryConfig {
    /// Validates the registry configuration.
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.url.trim().is_empty() {
            return Err(ConfigError::missing_field("registry.url").into());
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid_value("registry.timeout_secs", "Timeout cannot be 0").into());
        }

        Ok(())
    }

    /// Returns the cache validity window as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.saturating_mul(3600))
    }

    /// Returns the download timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Aircraft type table settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TypeDbConfig {
    /// Optional path to a type table replacing the bundled one
    pub path: Option<PathBuf>,
}

/// Unit system used when formatting distances for people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Miles
    #[default]
    Imperial,
    /// Kilometers
    Metric,
}

const KM_PER_MILE: f64 = 1.60934;

impl UnitSystem {
    /// Formats a distance in miles for display, e.g. "1.2 mi" or "1.9 km".
    ///
    /// A missing or zero distance renders as "Unknown".
    pub fn format_distance(&self, miles: Option<f64>) -> String {
        match miles {
            Some(d) if d != 0.0 => match self {
                UnitSystem::Imperial => format!("{:.1} mi", d),
                UnitSystem::Metric => format!("{:.1} km", d * KM_PER_MILE),
            },
            _ => "Unknown".to_string(),
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Target device; no notifications are sent when unset
    pub device: Option<String>,

    /// Base URL for deep links (defaults to the feed's web interface)
    pub external_url: Option<String>,

    /// Notification endpoint; notifications are only logged when unset
    pub webhook_url: Option<String>,

    /// Optional bearer token for the notification endpoint
    pub token: Option<String>,

    /// Unit system for distances in message bodies
    #[serde(default)]
    pub units: UnitSystem,

    /// Notify when a military aircraft appears
    #[serde(default = "default_true")]
    pub military: bool,

    /// Notify on emergency squawks
    #[serde(default = "default_true")]
    pub emergency: bool,

    /// Close-aircraft notifications
    #[serde(default)]
    pub proximity: ProximityConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            device: None,
            external_url: None,
            webhook_url: None,
            token: None,
            units: UnitSystem::Imperial,
            military: true,
            emergency: true,
            proximity: ProximityConfig::default(),
        }
    }
}

impl NotificationConfig {
    /// Validates the notification configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(device) = &self.device {
            if device.trim().is_empty() {
                return Err(ConfigError::invalid_value(
                    "notifications.device",
                    "Device cannot be blank; omit it to disable notifications",
                )
                .into());
            }
        }

        self.proximity.validate()
    }

    /// Returns the configured device, if notifications are enabled.
    pub fn target_device(&self) -> Option<&str> {
        self.device.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }
}

/// Thresholds for close-aircraft notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Whether close-aircraft notifications are enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum distance in miles
    #[serde(default = "default_proximity_distance")]
    pub distance_mi: f64,

    /// Altitude ceiling in feet (exclusive)
    #[serde(default = "default_proximity_altitude")]
    pub altitude_ft: i64,
}

fn default_proximity_distance() -> f64 {
    2.0
}

fn default_proximity_altitude() -> i64 {
    3000
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            distance_mi: default_proximity_distance(),
            altitude_ft: default_proximity_altitude(),
        }
    }
}

impl ProximityConfig {
    /// Validates the proximity thresholds.
    pub fn validate(&self) -> Result<()> {
        if self.distance_mi <= 0.0 {
            return Err(ConfigError::invalid_value(
                "notifications.proximity.distance_mi",
                "must be greater than 0",
            )
            .into());
        }

        if self.altitude_ft <= 0 {
            return Err(ConfigError::invalid_value(
                "notifications.proximity.altitude_ft",
                "must be greater than 0",
            )
            .into());
        }

        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "text" or "json"
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// Parses the log level string to a tracing Level.
    pub fn parse_level(&self) -> Result<Level> {
        self.level.parse().map_err(|_| {
            ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Invalid log level: {}", self.level),
            }
            .into()
        })
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Whether the Prometheus exporter is started
    #[serde(default)]
    pub enabled: bool,

    /// Exporter listen address
    #[serde(default = "default_metrics_listen")]
    pub listen: SocketAddr,
}

fn default_metrics_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9185))
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: default_metrics_listen(),
        }
    }
}
