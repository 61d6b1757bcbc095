//! Receiver feed client
//!
//! Fetches `aircraft.json` from a readsb/tar1090 style receiver and decodes
//! it into raw aircraft records. Also provides the one-shot probe used to
//! validate a receiver address before it is configured.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use skytrack_core::config::FeedConfig;
use skytrack_core::error::{FeedError, SetupError};
use skytrack_core::types::RawAircraft;
use std::time::Duration;
use tracing::debug;

/// Decoded `aircraft.json` payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedPayload {
    pub aircraft: Vec<RawAircraft>,
    /// Receiver timestamp
    pub now: Option<f64>,
    /// Receiver's total message counter
    pub messages: u64,
}

/// Parses an `aircraft.json` body.
///
/// The body must be a JSON object with an `aircraft` array. Individual
/// entries that cannot be decoded are skipped.
pub fn parse_payload(body: &str) -> Result<FeedPayload, FeedError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| FeedError::invalid_json(e.to_string()))?;

    let list = value
        .get("aircraft")
        .and_then(serde_json::Value::as_array)
        .ok_or(FeedError::MissingAircraft)?;

    let aircraft = list
        .iter()
        .filter_map(|entry| match serde_json::from_value::<RawAircraft>(entry.clone()) {
            Ok(raw) => Some(raw),
            Err(e) => {
                debug!(error = %e, "Skipping undecodable aircraft entry");
                None
            }
        })
        .collect();

    Ok(FeedPayload {
        aircraft,
        now: value.get("now").and_then(serde_json::Value::as_f64),
        messages: value.get("messages").and_then(serde_json::Value::as_u64).unwrap_or(0),
    })
}

/// HTTP client for one receiver.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(config: &FeedConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            url: config.aircraft_url(),
            timeout: config.timeout(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches and decodes the current aircraft list.
    pub async fn fetch(&self) -> Result<FeedPayload, FeedError> {
        let response = self
            .http
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeedError::http_status(&self.url, status.as_u16()));
        }

        let body = response.text().await.map_err(|e| self.map_request_error(e))?;
        parse_payload(&body)
    }

    fn map_request_error(&self, e: reqwest::Error) -> FeedError {
        if e.is_timeout() {
            FeedError::timeout(&self.url, self.timeout.as_secs())
        } else {
            FeedError::request(&self.url, e.to_string())
        }
    }
}

/// Result of probing a receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedProbe {
    /// Display title for the receiver
    pub title: String,
    pub aircraft_count: usize,
    pub last_update: Option<f64>,
}

/// Checks that a receiver answers with a usable aircraft list.
///
/// Network failures, timeouts and non-200 answers are `CannotConnect`; a
/// reachable receiver returning something other than an aircraft list is
/// `InvalidResponse`.
pub async fn probe_feed(http: &reqwest::Client, config: &FeedConfig) -> Result<FeedProbe, SetupError> {
    let client = FeedClient::new(config, http.clone());

    let payload = client.fetch().await.map_err(|e| match e {
        FeedError::InvalidJson { reason } => SetupError::invalid_response(reason),
        FeedError::MissingAircraft => SetupError::invalid_response("Missing aircraft data in response"),
        FeedError::Timeout { .. } => SetupError::cannot_connect("Timeout connecting to ADS-B source"),
        other => SetupError::cannot_connect(other.to_string()),
    })?;

    Ok(FeedProbe {
        title: format!("SkyTrack ({}:{})", config.host, config.port),
        aircraft_count: payload.aircraft.len(),
        last_update: payload.now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytrack_core::types::RawAltitude;

    #[test]
    fn test_parse_payload() {
        let body = r#"{
            "now": 1700000000.5,
            "messages": 123456,
            "aircraft": [
                {"hex": "a1b2c3", "flight": "UAL123 ", "alt_baro": 35000, "r_dst": 12.3},
                {"hex": "c0ffee", "alt_baro": "ground"}
            ]
        }"#;

        let payload = parse_payload(body).unwrap();
        assert_eq!(payload.now, Some(1700000000.5));
        assert_eq!(payload.messages, 123456);
        assert_eq!(payload.aircraft.len(), 2);
        assert_eq!(payload.aircraft[1].alt_baro, Some(RawAltitude::Label("ground".to_string())));
    }

    #[test]
    fn test_parse_payload_defaults() {
        let payload = parse_payload(r#"{"aircraft": []}"#).unwrap();
        assert!(payload.aircraft.is_empty());
        assert_eq!(payload.now, None);
        assert_eq!(payload.messages, 0);
    }

    #[test]
    fn test_parse_payload_missing_aircraft() {
        assert!(matches!(parse_payload(r#"{"now": 1}"#), Err(FeedError::MissingAircraft)));
        assert!(matches!(
            parse_payload(r#"{"aircraft": "nope"}"#),
            Err(FeedError::MissingAircraft)
        ));
    }

    #[test]
    fn test_parse_payload_invalid_json() {
        assert!(matches!(parse_payload("<html>"), Err(FeedError::InvalidJson { .. })));
    }

    #[test]
    fn test_parse_payload_skips_bad_entries() {
        let body = r#"{"aircraft": [{"hex": "a1"}, {"hex": 12, "lat": "north"}, "junk"]}"#;
        let payload = parse_payload(body).unwrap();
        assert_eq!(payload.aircraft.len(), 1);
        assert_eq!(payload.aircraft[0].hex.as_deref(), Some("a1"));
    }
}
