//! Error types for the SkyTrack aircraft tracker.
//!
//! Every failure in the tracker degrades to a safe default somewhere up the
//! call chain, so most of these errors end up logged rather than surfaced.
//! All errors are serializable so they can be reported from manual
//! operations and status queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using TrackerError as the error type.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Top-level error type for all SkyTrack operations.
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum TrackerError {
    /// Upstream feed errors
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Military registry download errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Setup validation errors
    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Parsing and deserialization errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Internal errors that shouldn't normally occur
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    /// Returns true if the next polling cycle may well succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            TrackerError::Feed(e) => e.is_transient(),
            TrackerError::Registry(_) | TrackerError::Notify(_) => true,
            _ => false,
        }
    }
}

/// Errors raised while fetching or decoding the local aircraft feed.
///
/// All of these are recoverable: the poller keeps its last good snapshot and
/// tries again on the next tick.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum FeedError {
    /// The feed answered with a non-200 status
    #[error("Error fetching ADS-B data from {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Transport level failure (connection refused, DNS, reset)
    #[error("Error fetching ADS-B data from {url}: {reason}")]
    Request { url: String, reason: String },

    /// The feed did not answer within the configured timeout
    #[error("Timeout fetching ADS-B data from {url} after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// The body was not valid JSON
    #[error("Invalid JSON from ADS-B source: {reason}")]
    InvalidJson { reason: String },

    /// The payload has no aircraft array
    #[error("Invalid ADS-B data: missing aircraft array")]
    MissingAircraft,
}

impl FeedError {
    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a transport error.
    pub fn request(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Request {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            timeout_secs,
        }
    }

    /// Creates an invalid JSON error.
    pub fn invalid_json(reason: impl Into<String>) -> Self {
        Self::InvalidJson {
            reason: reason.into(),
        }
    }

    /// Returns true for failures caused by the network rather than the payload.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FeedError::Timeout { .. } | FeedError::Request { .. } | FeedError::HttpStatus { .. }
        )
    }
}

/// Errors raised while downloading the military registry.
///
/// These never reach the user: the registry turns them into an empty,
/// time-stamped map and records the reason in its status.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum RegistryError {
    /// The registry answered with a non-200 status
    #[error("Failed to load military database: HTTP {status}")]
    HttpStatus { status: u16 },

    /// Transport level failure
    #[error("Error loading military database: {reason}")]
    Request { reason: String },

    /// Download exceeded the configured timeout
    #[error("Timeout loading military database after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The document could not be decoded
    #[error("Invalid military database document: {reason}")]
    InvalidDocument { reason: String },

    /// The registry was shut down while a download was in flight
    #[error("Military database load cancelled")]
    Cancelled,
}

/// Errors raised while delivering a notification.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum NotifyError {
    /// The notification endpoint rejected the request
    #[error("Notification to '{device}' rejected: HTTP {status}")]
    Rejected { device: String, status: u16 },

    /// The notification endpoint could not be reached
    #[error("Failed to send notification to '{device}': {reason}")]
    DeliveryFailed { device: String, reason: String },
}

impl NotifyError {
    /// Creates a delivery failed error.
    pub fn delivery_failed(device: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DeliveryFailed {
            device: device.into(),
            reason: reason.into(),
        }
    }
}

/// Errors returned when validating a feed during setup.
///
/// Distinguishes "nothing answered" from "something answered, but it is not
/// an aircraft feed".
#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum SetupError {
    /// The feed could not be reached or returned a non-200 status
    #[error("Cannot connect: {reason}")]
    CannotConnect { reason: String },

    /// The feed answered but the body is not an aircraft listing
    #[error("Invalid ADS-B response: {reason}")]
    InvalidResponse { reason: String },
}

impl SetupError {
    /// Creates a cannot connect error.
    pub fn cannot_connect(reason: impl Into<String>) -> Self {
        Self::CannotConnect {
            reason: reason.into(),
        }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }
}

/// Errors related to parsing and deserialization.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ParseError {
    /// Failed to parse JSON data
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    JsonError {
        line: usize,
        column: usize,
        message: String,
    },
}

impl ParseError {
    /// Creates a JSON parse error.
    pub fn json(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::JsonError {
            line,
            column,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::json(err.line(), err.column(), err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Parse(err.into())
    }
}

/// Errors related to configuration.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    /// Missing required configuration field
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
