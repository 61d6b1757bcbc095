//! End-to-end tracker tests: mock receiver and registry, recording sink.

mod common;

use common::*;
use skytrack_classify::{DetectionReason, LoadOutcome, RegistryPhase};
use skytrack_core::error::TrackerError;
use skytrack_notify::{NotificationKind, Priority};
use skytrack_service::Tracker;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_server() -> MockServer {
    let server = MockServer::start().await;
    mount_feed(&server).await;
    mount_registry(&server).await;
    server
}

fn tracker(server: &MockServer, sink: Arc<RecordingSink>) -> Tracker {
    Tracker::with_sink(tracker_config(server), reqwest::Client::new(), sink).unwrap()
}

#[tokio::test]
async fn test_poll_cycle_notifications() {
    let server = mock_server().await;
    let sink = Arc::new(RecordingSink::default());
    let tracker = tracker(&server, Arc::clone(&sink));

    assert!(tracker.refresh_military_database().await.succeeded());

    let summary = tracker.refresh_now().await.unwrap();
    assert_eq!(summary.aircraft_count, 5);
    assert_eq!(summary.closest_hex.as_deref(), Some("a1b2c3"));
    assert_eq!(summary.closest_distance_mi, Some(1.1));

    let military: Vec<String> = sink
        .of_kind(NotificationKind::Military)
        .into_iter()
        .map(|n| n.hex)
        .collect();
    assert_eq!(military, vec!["ae1234", "ae5678"]);

    let c17 = &sink.of_kind(NotificationKind::Military)[0];
    assert!(c17.message.starts_with("🪖 RCH871 at 18,000ft ↗️ 15.2 mi away"));
    assert!(c17.message.contains("Type: Boeing C-17 Globemaster III (4-engine jet)"));
    assert_eq!(c17.url, "http://adsb.local:8085");

    // The taxiing aircraft at 2.5 mi is outside the proximity radius.
    let proximity = sink.of_kind(NotificationKind::Proximity);
    assert_eq!(proximity.len(), 1);
    assert_eq!(proximity[0].hex, "a1b2c3");
    assert!(proximity[0].message.starts_with("🛩️ N172SP at 1,800ft → 1.1 mi away"));
    assert!(proximity[0].message.ends_with("Operator: Skyhawk Flying Club"));

    let emergency = sink.of_kind(NotificationKind::Emergency);
    assert_eq!(emergency.len(), 1);
    assert_eq!(emergency[0].priority, Priority::High);
    assert_eq!(emergency[0].message, "DAL42 squawking 7700 (GENERAL EMERGENCY) at 25.3 mi");

    // Same traffic again: only the emergency repeats.
    tracker.refresh_now().await.unwrap();
    assert_eq!(sink.count(), 5);
    assert_eq!(sink.of_kind(NotificationKind::Emergency).len(), 2);

    let status = tracker.status();
    assert_eq!(status.feed.polls, 2);
    assert_eq!(status.notifications.military_sent, 2);
    assert_eq!(status.notifications.proximity_sent, 1);
    assert_eq!(status.notifications.emergency_sent, 2);
}

#[tokio::test]
async fn test_aircraft_details() {
    let server = mock_server().await;
    let tracker = tracker(&server, Arc::new(RecordingSink::default()));
    tracker.refresh_military_database().await;
    tracker.refresh_now().await.unwrap();

    let details = tracker.aircraft_details("AE1234");
    assert!(details.found);
    let aircraft = details.aircraft.unwrap();
    assert_eq!(aircraft.tail, "05-5140");
    assert_eq!(aircraft.flight.as_deref(), Some("RCH871"));
    assert_eq!(aircraft.altitude_ft, 18000);
    let entry = details.military.unwrap();
    assert_eq!(entry.description, "Boeing C-17A Globemaster III");

    let civil = tracker.aircraft_details("a4c5d6");
    assert!(civil.found);
    assert!(civil.military.is_none());
    assert_eq!(civil.aircraft.unwrap().squawk.as_deref(), Some("7700"));

    let missing = tracker.aircraft_details(" FFFFFF ");
    assert!(!missing.found);
    assert_eq!(missing.error.as_deref(), Some("Aircraft with hex code ffffff not found"));
}

#[tokio::test]
async fn test_military_report() {
    let server = mock_server().await;
    let tracker = tracker(&server, Arc::new(RecordingSink::default()));
    tracker.refresh_military_database().await;
    tracker.refresh_now().await.unwrap();

    let report = tracker.military_report();
    assert_eq!(report.total_aircraft, 5);
    assert_eq!(report.military_detected, 2);
    assert_eq!(report.detection_method, "database_only");

    let first = &report.military_aircraft[0];
    assert_eq!(first.hex, "ae1234");
    assert_eq!(first.distance_mi, Some(15.2));
    assert_eq!(first.detection_reasons, vec![DetectionReason::DatabaseMatch]);

    // Unknown distance sorts last.
    assert_eq!(report.military_aircraft[1].hex, "ae5678");
    assert_eq!(report.military_aircraft[1].distance_mi, None);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["military_aircraft"][0]["detection_reasons"][0], "DATABASE_MATCH");
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_reload_military_database() {
    let server = mock_server().await;
    let tracker = tracker(&server, Arc::new(RecordingSink::default()));

    let report = tracker.reload_military_database().await;
    assert!(report.success);
    assert_eq!(report.database_size, 2);
    assert_eq!(report.message, "Database loaded successfully");

    let status = tracker.registry_status();
    assert_eq!(status.phase, RegistryPhase::Loaded);
    assert!(status.loaded);
    assert_eq!(status.last_outcome, Some(LoadOutcome::Loaded { entries: 2 }));
}

#[tokio::test]
async fn test_reload_failure_reports_empty_database() {
    let server = MockServer::start().await;
    mount_feed(&server).await;
    Mock::given(method("GET"))
        .and(path(REGISTRY_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let tracker = tracker(&server, Arc::clone(&sink));

    let report = tracker.reload_military_database().await;
    assert!(!report.success);
    assert_eq!(report.database_size, 0);
    assert_eq!(report.message, "Database load failed");
    assert!(matches!(
        tracker.registry_status().last_outcome,
        Some(LoadOutcome::Failed { .. })
    ));

    // Classification degrades to "not military"; everything else still works.
    tracker.refresh_now().await.unwrap();
    assert!(sink.of_kind(NotificationKind::Military).is_empty());
    assert_eq!(sink.of_kind(NotificationKind::Proximity).len(), 1);
    assert_eq!(tracker.military_report().military_detected, 0);
}

#[tokio::test]
async fn test_feed_failure_keeps_snapshot() {
    let server = MockServer::start().await;
    mount_registry(&server).await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("aircraft.json")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(FEED_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let tracker = tracker(&server, Arc::new(RecordingSink::default()));
    tracker.refresh_now().await.unwrap();

    let err = tracker.refresh_now().await.unwrap_err();
    assert!(matches!(err, TrackerError::Feed(_)));
    assert!(err.is_transient());

    assert_eq!(tracker.snapshot().unwrap().len(), 5);
    let status = tracker.poller_status();
    assert!(!status.available);
    assert_eq!(status.consecutive_failures, 1);
    assert!(tracker.aircraft_details("a1b2c3").found);
}

#[tokio::test]
async fn test_notifications_disabled_without_device() {
    let server = mock_server().await;
    let sink = Arc::new(RecordingSink::default());
    let mut config = tracker_config(&server);
    config.notifications.device = None;
    let tracker = Tracker::with_sink(config, reqwest::Client::new(), sink.clone()).unwrap();

    tracker.refresh_military_database().await;
    tracker.refresh_now().await.unwrap();

    assert_eq!(sink.count(), 0);
    assert_eq!(tracker.military_report().military_detected, 2);
}

#[tokio::test]
async fn test_check_feed() {
    let server = mock_server().await;
    let tracker = tracker(&server, Arc::new(RecordingSink::default()));

    let probe = tracker.check_feed().await.unwrap();
    assert_eq!(probe.aircraft_count, 5);
    assert_eq!(probe.last_update, Some(1760781600.4));
    assert_eq!(
        probe.title,
        format!("SkyTrack ({}:{})", server.address().ip(), server.address().port())
    );
}

#[tokio::test]
async fn test_start_and_shutdown() {
    let server = mock_server().await;
    let sink = Arc::new(RecordingSink::default());
    let tracker = tracker(&server, Arc::clone(&sink));

    tracker.start();

    // First poll and the registry warm-up both run right away.
    tokio::time::timeout(Duration::from_secs(5), async {
        while tracker.snapshot().is_none() || tracker.registry_status().phase != RegistryPhase::Loaded {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("tracker never published a snapshot");

    assert!(tracker.poller_status().running);
    assert_eq!(tracker.snapshot().unwrap().len(), 5);

    tracker.shutdown().await;
    assert!(!tracker.poller_status().running);
    assert_eq!(tracker.registry().len(), 2);
}
