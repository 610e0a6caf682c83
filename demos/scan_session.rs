//! Scan session walkthrough with scripted cameras
//!
//! Runs a one-shot scan on a mock phone, then a continuous scan, printing
//! every scanner event. Book details come from the live catalog.

use shelfscan::mock::{MockBarcodeDecoder, MockMediaDevices};
use shelfscan::{DetectMode, ScanConfig, ScanController, ScanEvent, TextPage};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ScanConfig::default().with_debug_logging();
    shelfscan::init_logging(config.debug_logging);

    println!("📷 One-shot scan");
    one_shot(config.clone()).await?;

    println!("\n🔁 Continuous scan");
    continuous(config.detect_mode(DetectMode::ContinuousLookup)).await?;

    Ok(())
}

async fn one_shot(config: ScanConfig) -> Result<(), Box<dyn std::error::Error>> {
    let decoder = Arc::new(MockBarcodeDecoder::new());
    let page = Arc::new(TextPage::new());
    let controller = ScanController::builder(config)
        .media_devices(Arc::new(MockMediaDevices::phone()))
        .decoder(decoder.clone())
        .page(page.clone())
        .build()?;
    let mut events = controller.events();

    controller.start_scan().await?;
    decoder.emit("9780140328721");
    controller.wait_for_detection().await;

    for event in events.drain() {
        print_event(&event);
    }
    println!("   {}", page.scan_result());
    println!("   {}", page.book_info().replace('\n', "\n   "));
    Ok(())
}

async fn continuous(config: ScanConfig) -> Result<(), Box<dyn std::error::Error>> {
    let decoder = Arc::new(MockBarcodeDecoder::new());
    let page = Arc::new(TextPage::new());
    let controller = ScanController::builder(config)
        .media_devices(Arc::new(MockMediaDevices::laptop()))
        .decoder(decoder.clone())
        .page(page.clone())
        .build()?;
    let mut events = controller.events();

    controller.start_scan().await?;
    for isbn in ["9780140328721", "9780261103573"] {
        decoder.emit(isbn);
        loop {
            match tokio::time::timeout(Duration::from_secs(15), events.next()).await {
                Ok(Some(event)) => {
                    print_event(&event);
                    if matches!(event, ScanEvent::LookupCompleted { .. }) {
                        break;
                    }
                }
                Ok(None) | Err(_) => {
                    println!("   ⏱️ no lookup result for {}", isbn);
                    break;
                }
            }
        }
        println!("   {}", page.book_info().replace('\n', "\n   "));
    }

    let stopped = controller.stop_scan().await;
    println!("🛑 Stopped {} track(s)", stopped);
    Ok(())
}

fn print_event(event: &ScanEvent) {
    let marker = if event.is_error_event() { "❌" } else { "📡" };
    println!("{} {:?}", marker, event);
}
