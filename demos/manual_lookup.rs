//! Manual ISBN lookup against the live Open Library catalog
//!
//! Usage: cargo run --example manual_lookup -- 9780140328721

use shelfscan::{ScanConfig, TextPage};
use shelfscan::{CatalogClient, ManualEntry};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ScanConfig::default();
    shelfscan::init_logging(config.debug_logging);

    let isbn = std::env::args().nth(1).unwrap_or_default();
    let catalog = CatalogClient::new(&config.catalog)?;
    let page = Arc::new(TextPage::new());
    let form = ManualEntry::new(catalog, page.clone());

    println!("📖 Looking up {:?} at {}", isbn, config.catalog.base_url);
    match form.submit(&isbn).await {
        Ok(result) => {
            let marker = if result.found { "✅" } else { "❓" };
            println!("{} {}", marker, page.book_info());
        }
        Err(e) => {
            for alert in page.alerts() {
                println!("⚠️ {}", alert);
            }
            println!("❌ {}", e);
        }
    }

    Ok(())
}
