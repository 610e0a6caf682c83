//! Scan controller lifecycle tests
//!
//! Drives full scans against mock cameras and a scripted decoder, covering
//! every detection mode, restart while active, and the failure paths that
//! must leave the scanner idle with no camera held.

mod common;

use common::*;
use shelfscan::mock::MockMediaDevices;
use shelfscan::*;

// ============================================================================
// DETECTION MODES
// ============================================================================

#[tokio::test]
async fn test_lookup_once_stops_then_renders_book() {
    let h = Harness::phone(DetectMode::LookupOnce);
    let mut events = h.controller.events();

    h.controller.start_scan().await.unwrap();
    assert!(h.controller.is_scanning());
    assert_eq!(h.devices.live_track_count(), 1);

    assert_eq!(h.decoder.emit(ISBN), 1);
    h.controller.wait_for_detection().await;

    assert_eq!(h.page.scan_result(), format!("Barcode detected: {}", ISBN));
    assert_eq!(h.page.book_info(), MR_FOX_RENDERED);
    assert_eq!(h.devices.live_track_count(), 0);
    assert!(!h.controller.is_scanning());
    assert_eq!(h.controller.session_state().await, SessionState::Idle);
    assert_eq!(h.catalog.urls(), vec![format!("https://openlibrary.org/isbn/{}.json", ISBN)]);
    assert_eq!(h.decoder.subscriber_count(), 0);

    // Stream released before the lookup result arrives
    let kinds: Vec<&str> = events.drain().iter().map(|e| e.event_type()).collect();
    assert_eq!(
        kinds,
        vec![
            "scan_started",
            "stream_acquired",
            "decoder_started",
            "code_detected",
            "scan_stopped",
            "lookup_completed",
        ]
    );
}

#[tokio::test]
async fn test_lookup_once_not_found_renders_placeholder() {
    let h = Harness::new(
        ScanConfig::default(),
        MockMediaDevices::phone(),
        StubCatalog::new(404, ""),
    );

    h.controller.start_scan().await.unwrap();
    h.decoder.emit(ISBN);
    h.controller.wait_for_detection().await;

    assert_eq!(h.page.book_info(), "No book details found.");
    assert_eq!(h.devices.live_track_count(), 0);
}

#[tokio::test]
async fn test_stop_only_never_looks_up() {
    let h = Harness::phone(DetectMode::StopOnly);

    h.controller.start_scan().await.unwrap();
    h.decoder.emit(ISBN);
    h.controller.wait_for_detection().await;

    assert_eq!(h.page.scan_result(), format!("Barcode detected: {}", ISBN));
    assert_eq!(h.page.book_info(), "");
    assert_eq!(h.catalog.request_count(), 0);
    assert_eq!(h.devices.live_track_count(), 0);
    assert!(!h.controller.is_scanning());
}

#[tokio::test]
async fn test_display_only_keeps_scanning() {
    let h = Harness::phone(DetectMode::DisplayOnly);
    let mut events = h.controller.events();

    h.controller.start_scan().await.unwrap();
    h.decoder.emit("111");
    wait_for(&mut events, |e| matches!(e, ScanEvent::CodeDetected { code } if code == "111")).await;
    h.decoder.emit("222");
    wait_for(&mut events, |e| matches!(e, ScanEvent::CodeDetected { code } if code == "222")).await;

    assert_eq!(h.page.scan_result(), "Barcode detected: 222");
    assert!(h.controller.is_scanning());
    assert_eq!(h.devices.live_track_count(), 1);
    assert_eq!(h.catalog.request_count(), 0);

    assert_eq!(h.controller.stop_scan().await, 1);
    assert_eq!(h.devices.live_track_count(), 0);
}

#[tokio::test]
async fn test_continuous_lookup_redisplays_each_detection() {
    let h = Harness::phone(DetectMode::ContinuousLookup);
    let mut events = h.controller.events();

    h.controller.start_scan().await.unwrap();
    for code in ["9780140328721", "9780141346809"] {
        h.decoder.emit(code);
        wait_for(&mut events, |e| {
            matches!(e, ScanEvent::LookupCompleted { isbn, found: true } if isbn == code)
        })
        .await;
    }

    assert_eq!(h.catalog.request_count(), 2);
    assert_eq!(h.page.book_info(), MR_FOX_RENDERED);
    assert!(h.controller.is_scanning());
    assert_eq!(h.devices.live_track_count(), 1);

    h.controller.stop_scan().await;
    assert!(!h.controller.is_scanning());
    assert_eq!(h.decoder.subscriber_count(), 0);
}

// ============================================================================
// SESSION LIFECYCLE
// ============================================================================

#[tokio::test]
async fn test_restart_releases_previous_stream_first() {
    let h = Harness::phone(DetectMode::DisplayOnly);

    h.controller.start_scan().await.unwrap();
    h.controller.start_scan().await.unwrap();

    let tracks = h.devices.tracks();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].stop_calls(), 1);
    assert_eq!(tracks[1].stop_calls(), 0);
    assert_eq!(h.devices.live_track_count(), 1);
    assert_eq!(h.decoder.subscriber_count(), 1);

    h.controller.stop_scan().await;
    assert_eq!(h.devices.live_track_count(), 0);
}

#[tokio::test]
async fn test_stop_while_waiting_leaves_one_handler() {
    let h = Harness::phone(DetectMode::LookupOnce);
    h.controller.start_scan().await.unwrap();

    // A waiter that gives up must not carry the handler off with it
    let gave_up = tokio::time::timeout(
        std::time::Duration::from_millis(20),
        h.controller.wait_for_detection(),
    )
    .await;
    assert!(gave_up.is_err());

    // A waiter still parked when the scan is stopped wakes up
    let ((), stopped) = tokio::join!(h.controller.wait_for_detection(), h.controller.stop_scan());
    assert_eq!(stopped, 1);
    assert_eq!(h.decoder.subscriber_count(), 0);

    h.controller.start_scan().await.unwrap();
    assert_eq!(h.decoder.subscriber_count(), 1);

    assert_eq!(h.decoder.emit(ISBN), 1);
    h.controller.wait_for_detection().await;

    assert_eq!(h.catalog.request_count(), 1);
    assert_eq!(h.devices.live_track_count(), 0);
    assert_eq!(h.page.book_info(), MR_FOX_RENDERED);
}

#[tokio::test]
async fn test_wait_after_finished_detection_returns() {
    let h = Harness::phone(DetectMode::StopOnly);
    h.controller.start_scan().await.unwrap();
    h.decoder.emit(ISBN);

    h.controller.wait_for_detection().await;
    h.controller.wait_for_detection().await;

    assert!(!h.controller.is_scanning());
    assert_eq!(h.controller.stop_scan().await, 0);
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let h = Harness::new(
        ScanConfig::default(),
        MockMediaDevices::phone().with_audio_tracks(),
        StubCatalog::new(200, MR_FOX_JSON),
    );

    h.controller.start_scan().await.unwrap();
    assert_eq!(h.controller.stop_scan().await, 2);
    assert_eq!(h.controller.stop_scan().await, 0);

    for track in h.devices.tracks() {
        assert_eq!(track.stop_calls(), 1);
    }
    assert_eq!(h.controller.session_state().await, SessionState::Idle);
}

#[tokio::test]
async fn test_stop_without_start_is_harmless() {
    let h = Harness::phone(DetectMode::LookupOnce);
    let mut events = h.controller.events();

    assert_eq!(h.controller.stop_scan().await, 0);

    assert!(h.devices.requests().is_empty());
    assert_eq!(
        events.try_next(),
        Some(ScanEvent::ScanStopped { tracks_stopped: 0 })
    );
}

#[tokio::test]
async fn test_decoder_configured_against_attached_stream() {
    let h = Harness::phone(DetectMode::LookupOnce);
    let mut events = h.controller.events();

    h.controller.start_scan().await.unwrap();

    let stream_id = match wait_for(&mut events, |e| matches!(e, ScanEvent::StreamAcquired { .. })).await {
        ScanEvent::StreamAcquired { stream_id, device_id } => {
            assert_eq!(device_id.as_deref(), Some("back-0"));
            stream_id
        }
        other => panic!("unexpected event {:?}", other),
    };
    assert_eq!(h.decoder.target_source_id(), Some(stream_id));
    assert_eq!(h.devices.requests()[0].preferred_device_id.as_deref(), Some("back-0"));

    let config = h.decoder.last_config().unwrap();
    assert_eq!(config.readers, Symbology::book_readers());
    assert!(config.locate);

    h.controller.stop_scan().await;
    assert_eq!(h.controller.surface().source_id(), None);
}

// ============================================================================
// FAILURE PATHS
// ============================================================================

#[tokio::test]
async fn test_permission_denied_aborts_cleanly() {
    let h = Harness::phone(DetectMode::LookupOnce);
    h.devices.fail_next_acquire(MediaError::PermissionDenied {
        operation: "NotAllowedError".to_string(),
    });

    let result = h.controller.start_scan().await;

    assert!(matches!(result, Err(ScanError::PermissionDenied { .. })));
    assert_eq!(h.controller.session_state().await, SessionState::Idle);
    assert_eq!(h.decoder.init_calls(), 0);
    assert!(!h.controller.is_scanning());

    // The next attempt starts from a clean slate
    h.controller.start_scan().await.unwrap();
    assert_eq!(h.devices.live_track_count(), 1);
    h.controller.stop_scan().await;
}

#[tokio::test]
async fn test_decoder_init_failure_releases_stream() {
    let h = Harness::phone(DetectMode::LookupOnce);
    h.decoder.fail_init("unknown reader");
    let mut events = h.controller.events();

    let result = h.controller.start_scan().await;

    assert_eq!(
        result,
        Err(ScanError::DecoderInit {
            reason: "unknown reader".to_string()
        })
    );
    assert_eq!(h.decoder.start_calls(), 0);
    assert_eq!(h.devices.live_track_count(), 0);
    assert_eq!(h.controller.surface().source_id(), None);
    assert_eq!(h.controller.session_state().await, SessionState::Idle);
    assert!(events.drain().iter().any(|e| e.is_error_event()));
}

#[tokio::test]
async fn test_exact_facing_mode_fails_without_rear_camera() {
    let h = Harness::new(
        ScanConfig::default().facing_mode(FacingModeStrategy::Exact),
        MockMediaDevices::laptop(),
        StubCatalog::new(200, MR_FOX_JSON),
    );

    let result = h.controller.start_scan().await;

    assert!(matches!(result, Err(ScanError::DeviceUnavailable { .. })));
    assert_eq!(h.devices.live_track_count(), 0);
}

#[tokio::test]
async fn test_ideal_facing_mode_works_on_laptop() {
    let h = Harness::new(
        ScanConfig::default(),
        MockMediaDevices::laptop(),
        StubCatalog::new(200, MR_FOX_JSON),
    );

    h.controller.start_scan().await.unwrap();

    let request = &h.devices.requests()[0];
    assert!(request.preferred_device_id.is_none());
    assert_eq!(
        request.facing_mode,
        Some(FacingModeConstraint::Ideal(FacingMode::Environment))
    );
    h.controller.stop_scan().await;
}

#[test]
fn test_builder_requires_decoder() {
    let result = ScanController::builder(ScanConfig::default())
        .media_devices(std::sync::Arc::new(MockMediaDevices::phone()))
        .page(std::sync::Arc::new(TextPage::new()))
        .build();

    assert!(matches!(result, Err(ScanError::Configuration { .. })));
}

#[tokio::test]
async fn test_shutdown_releases_camera() {
    let h = Harness::phone(DetectMode::ContinuousLookup);
    h.controller.start_scan().await.unwrap();

    h.controller.shutdown().await;

    assert_eq!(h.devices.live_track_count(), 0);
    assert!(!h.controller.is_scanning());
}

#[tokio::test]
async fn test_dropping_controller_releases_camera() {
    let h = Harness::phone(DetectMode::DisplayOnly);
    h.controller.start_scan().await.unwrap();
    let devices = h.devices.clone();
    let decoder = h.decoder.clone();

    drop(h);

    assert_eq!(devices.live_track_count(), 0);
    assert!(!decoder.is_running());
}
