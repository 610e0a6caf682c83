//! Manual ISBN entry, bypassing the camera

use crate::error::ScanError;
use crate::page::Page;
use shelfscan_lookup::{render, CatalogClient, LookupResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Alert shown when the form is submitted empty
pub const EMPTY_ISBN_ALERT: &str = "Please enter an ISBN.";

/// The manual ISBN form
#[derive(Clone)]
pub struct ManualEntry {
    catalog: CatalogClient,
    page: Arc<dyn Page>,
}

impl ManualEntry {
    pub fn new(catalog: CatalogClient, page: Arc<dyn Page>) -> Self {
        Self { catalog, page }
    }

    /// Submit the form's text.
    ///
    /// Blank input raises the page alert and returns `InputValidation`
    /// without touching the network. Otherwise the lookup result, found or
    /// not, is rendered into the book-info panel and returned.
    pub async fn submit(&self, input: &str) -> Result<LookupResult, ScanError> {
        let isbn = input.trim();
        if isbn.is_empty() {
            debug!("Rejected empty manual ISBN");
            self.page.alert(EMPTY_ISBN_ALERT);
            return Err(ScanError::InputValidation {
                message: "ISBN must not be empty".to_string(),
            });
        }

        info!("⌨️ Manual lookup for {}", isbn);
        let result = self.catalog.lookup(isbn).await;
        self.page.show_book_info(&render(Some(&result)));
        Ok(result)
    }
}
