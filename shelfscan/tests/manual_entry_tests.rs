//! Manual ISBN entry tests

mod common;

use common::*;
use shelfscan::mock::MockMediaDevices;
use shelfscan::*;

#[tokio::test]
async fn test_blank_input_alerts_without_request() {
    let h = Harness::phone(DetectMode::LookupOnce);
    let form = h.controller.manual_entry();

    for input in ["", "   ", "\t\n"] {
        let result = form.submit(input).await;
        assert!(matches!(result, Err(ScanError::InputValidation { .. })));
    }

    assert_eq!(h.page.alerts(), vec![EMPTY_ISBN_ALERT; 3]);
    assert_eq!(h.catalog.request_count(), 0);
    assert_eq!(h.page.book_info(), "");
}

#[tokio::test]
async fn test_padded_input_is_trimmed() {
    let h = Harness::phone(DetectMode::LookupOnce);

    let result = h
        .controller
        .manual_entry()
        .submit(&format!("  {}  ", ISBN))
        .await
        .unwrap();

    assert!(result.found);
    assert_eq!(result.isbn, ISBN);
    assert_eq!(h.catalog.urls(), vec![format!("https://openlibrary.org/isbn/{}.json", ISBN)]);
    assert_eq!(h.page.book_info(), MR_FOX_RENDERED);
    assert!(h.page.alerts().is_empty());
}

#[tokio::test]
async fn test_unknown_isbn_renders_placeholder() {
    let h = Harness::new(
        ScanConfig::default(),
        MockMediaDevices::phone(),
        StubCatalog::new(404, r#"{"error": "notfound"}"#),
    );

    let result = h.controller.manual_entry().submit("0000000000").await.unwrap();

    assert!(!result.found);
    assert_eq!(h.page.book_info(), "No book details found.");
}

#[tokio::test]
async fn test_manual_entry_works_while_scanning() -> anyhow::Result<()> {
    let h = Harness::phone(DetectMode::DisplayOnly);
    h.controller.start_scan().await?;

    h.controller.manual_entry().submit(ISBN).await?;

    assert_eq!(h.page.book_info(), MR_FOX_RENDERED);
    assert!(h.controller.is_scanning());
    assert_eq!(h.devices.live_track_count(), 1);

    h.controller.stop_scan().await;
    Ok(())
}
