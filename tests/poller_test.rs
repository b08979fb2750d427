// Tests for the presence poll loop

mod common;

use std::time::Duration as StdDuration;

use ableton_presence::config::{AppConfig, SharedConfig};
use ableton_presence::core::{Poller, Shutdown};
use ableton_presence::monitor::{ProcessProbe, SessionTracker};
use ableton_presence::presence::{PresenceDescriptor, PresencePublisher, TransportError};
use chrono::Duration;
use common::{broken_pipe, rejected, t0, FakeProcess, FakeTitle, FakeTransport, HangingProcess};

struct Harness {
    poller: Poller<FakeTransport>,
    process: FakeProcess,
    title: FakeTitle,
    config: SharedConfig,
}

async fn harness_with(transport: FakeTransport, process_probe: Option<Box<dyn ProcessProbe>>) -> Harness {
    let config = SharedConfig::new(AppConfig::default());
    let process = FakeProcess::default();
    let title = FakeTitle::default();

    let mut publisher = PresencePublisher::new(transport, "app-123");
    publisher.connect().await.unwrap();

    let poller = Poller::new(
        config.clone(),
        process_probe.unwrap_or_else(|| Box::new(process.clone()) as Box<dyn ProcessProbe>),
        Box::new(title.clone()),
        SessionTracker::new(Duration::hours(2)),
        publisher,
        StdDuration::from_secs(15),
    );

    Harness {
        poller,
        process,
        title,
        config,
    }
}

async fn harness() -> Harness {
    harness_with(FakeTransport::default(), None).await
}

#[tokio::test]
async fn test_running_tick_publishes_active() {
    let mut h = harness().await;
    h.process.set_running(true);
    h.title.set(Some("My Track - Ableton Live 12 Suite"));

    let report = h.poller.tick_at(t0()).await;

    assert!(report.published);
    match report.descriptor {
        PresenceDescriptor::Active(active) => {
            assert_eq!(active.project_name, "My Track");
            assert_eq!(active.custom_status, "Making music");
            assert_eq!(active.session_start, Some(t0()));
        }
        other => panic!("expected active presence, got {:?}", other),
    }
    let activity = &h.poller.publisher().transport().activities[0];
    assert_eq!(activity.details.as_deref(), Some("🎵 My Track"));
}

#[tokio::test]
async fn test_idle_tick_publishes_waiting_since_now() {
    let mut h = harness().await;

    let report = h.poller.tick_at(t0()).await;

    assert!(report.published);
    match report.descriptor {
        PresenceDescriptor::Waiting(waiting) => {
            assert_eq!(waiting.since, t0());
            assert_eq!(waiting.app_label, "Ableton Live 12");
        }
        other => panic!("expected waiting presence, got {:?}", other),
    }
}

#[tokio::test]
async fn test_waiting_after_stop_shows_session_start() {
    let mut h = harness().await;
    h.process.set_running(true);
    h.poller.tick_at(t0()).await;

    h.process.set_running(false);
    let report = h.poller.tick_at(t0() + Duration::minutes(5)).await;

    match report.descriptor {
        PresenceDescriptor::Waiting(waiting) => assert_eq!(waiting.since, t0()),
        other => panic!("expected waiting presence, got {:?}", other),
    }
}

#[tokio::test]
async fn test_title_not_queried_when_stopped() {
    let mut h = harness().await;
    h.title.set(Some("Ghost - Ableton Live 12 Suite"));

    let report = h.poller.tick_at(t0()).await;

    assert!(!report.snapshot.running);
    assert_eq!(report.snapshot.project_name, "Unknown Project");
}

#[tokio::test]
async fn test_status_change_applies_next_tick() {
    let mut h = harness().await;
    h.process.set_running(true);
    h.poller.tick_at(t0()).await;

    h.config.set_custom_status("Mixing down").await.unwrap();
    h.poller.tick_at(t0() + Duration::seconds(15)).await;

    let activities = &h.poller.publisher().transport().activities;
    assert_eq!(activities[1].state.as_deref(), Some("🔥 Mixing down"));
}

#[tokio::test]
async fn test_disconnect_reconnects_before_next_publish() {
    let mut transport = FakeTransport::default();
    transport.fail_next_activity(broken_pipe());
    let mut h = harness_with(transport, None).await;

    let report = h.poller.tick_at(t0()).await;
    assert!(!report.published);
    assert!(!h.poller.publisher().is_connected());
    assert_eq!(h.poller.publisher().transport().logins, 1);

    let report = h.poller.tick_at(t0() + Duration::seconds(15)).await;
    assert!(report.published);
    assert!(h.poller.publisher().is_connected());
    assert_eq!(h.poller.publisher().transport().logins, 2);
}

#[tokio::test]
async fn test_other_publish_error_reconnects_immediately() {
    let mut transport = FakeTransport::default();
    transport.fail_next_activity(rejected());
    let mut h = harness_with(transport, None).await;

    let report = h.poller.tick_at(t0()).await;

    assert!(!report.published);
    assert!(h.poller.publisher().is_connected());
    let transport = h.poller.publisher().transport();
    assert_eq!(transport.logins, 2);
    assert_eq!(transport.logouts, 1);
}

#[tokio::test]
async fn test_failed_reconnects_do_not_stop_polling() {
    let mut transport = FakeTransport::default();
    transport.fail_next_activity(broken_pipe());
    let mut h = harness_with(transport, None).await;
    h.poller.tick_at(t0()).await;

    let transport = h.poller.publisher_mut().transport_mut();
    transport.fail_next_login(TransportError::EndpointNotFound);
    transport.fail_next_login(TransportError::EndpointNotFound);

    let report = h.poller.tick_at(t0() + Duration::seconds(15)).await;
    assert!(!report.published);
    let report = h.poller.tick_at(t0() + Duration::seconds(30)).await;
    assert!(!report.published);
    assert!(!h.poller.publisher().is_connected());

    let report = h.poller.tick_at(t0() + Duration::seconds(45)).await;
    assert!(report.published);
    assert_eq!(h.poller.publisher().transport().logins, 4);
}

#[tokio::test]
async fn test_session_survives_publish_outage() {
    let mut transport = FakeTransport::default();
    transport.fail_next_activity(broken_pipe());
    let mut h = harness_with(transport, None).await;
    h.process.set_running(true);

    h.poller.tick_at(t0()).await;
    let report = h.poller.tick_at(t0() + Duration::minutes(1)).await;

    assert_eq!(report.snapshot.session_start, Some(t0()));
    assert_eq!(h.poller.tracker().session_start(), Some(t0()));
}

#[tokio::test]
async fn test_run_stops_on_shutdown_and_disconnects() {
    let h = harness().await;
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();

    let trigger = async {
        tokio::time::sleep(StdDuration::from_millis(50)).await;
        shutdown.trigger();
    };

    let (publisher, ()) = tokio::time::timeout(
        StdDuration::from_secs(5),
        async { tokio::join!(h.poller.run(signal), trigger) },
    )
    .await
    .expect("poller did not stop");

    assert!(!publisher.is_connected());
    assert_eq!(publisher.transport().logouts, 1);
    assert!(!publisher.transport().activities.is_empty());
}

#[tokio::test]
async fn test_shutdown_abandons_hung_tick() {
    let h = harness_with(FakeTransport::default(), Some(Box::new(HangingProcess))).await;
    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();

    let trigger = async {
        tokio::time::sleep(StdDuration::from_millis(50)).await;
        shutdown.trigger();
    };

    let (publisher, ()) = tokio::time::timeout(
        StdDuration::from_secs(5),
        async { tokio::join!(h.poller.run(signal), trigger) },
    )
    .await
    .expect("poller did not stop");

    assert!(publisher.transport().activities.is_empty());
    assert!(!publisher.is_connected());
}
