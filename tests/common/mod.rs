//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use skytrack_core::config::AppConfig;
use skytrack_core::error::NotifyError;
use skytrack_notify::{Notification, NotificationKind, NotificationSink};
use std::path::PathBuf;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const FEED_PATH: &str = "/data/aircraft.json";
pub const REGISTRY_PATH: &str = "/db/aircrafts.json";
pub const DEVICE: &str = "mobile_app_pixel";

/// Get the path to test fixtures
pub fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir).join("tests").join("fixtures")
}

/// Read a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture {:?}", path))
}

/// Serve the receiver feed fixture
pub async fn mount_feed(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("aircraft.json")))
        .mount(server)
        .await;
}

/// Serve the registry fixture
pub async fn mount_registry(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(REGISTRY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("military_registry.json")))
        .mount(server)
        .await;
}

/// Tracker configuration pointing feed and registry at the mock server
pub fn tracker_config(server: &MockServer) -> AppConfig {
    let address = server.address();
    let mut config = AppConfig::default();
    config.feed.host = address.ip().to_string();
    config.feed.port = address.port();
    config.feed.update_interval_secs = 5;
    config.registry.url = format!("{}{}", server.uri(), REGISTRY_PATH);
    config.registry.timeout_secs = 5;
    config.notifications.device = Some(DEVICE.to_string());
    config.notifications.external_url = Some("http://adsb.local:8085".to_string());
    config
}

/// Sink that records every notification it is handed
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn of_kind(&self, kind: NotificationKind) -> Vec<Notification> {
        self.sent.lock().iter().filter(|n| n.kind == kind).cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, device: &str, notification: &Notification) -> Result<(), NotifyError> {
        assert_eq!(device, DEVICE);
        self.sent.lock().push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_dir_exists() {
        let dir = fixtures_dir();
        assert!(dir.exists(), "Fixtures directory should exist");
    }

    #[test]
    fn test_fixtures_are_json() {
        let feed: serde_json::Value = serde_json::from_str(&load_fixture("aircraft.json")).unwrap();
        assert!(feed["aircraft"].is_array());

        let registry: serde_json::Value = serde_json::from_str(&load_fixture("military_registry.json")).unwrap();
        assert!(registry.is_object());
    }
}
