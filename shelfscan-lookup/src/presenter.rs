//! Text rendering of lookup results

use crate::model::LookupResult;

pub const NO_DETAILS: &str = "No book details found.";
pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_AUTHORS: &str = "Unknown";
pub const NO_DESCRIPTION: &str = "No description available.";

/// Render a lookup result for the book-info panel.
///
/// A missing or negative result renders the "no details" placeholder; each
/// absent field of a found book falls back to its own placeholder.
pub fn render(result: Option<&LookupResult>) -> String {
    let result = match result {
        Some(result) if result.found => result,
        _ => return NO_DETAILS.to_string(),
    };

    let title = result.title.as_deref().unwrap_or(UNTITLED);
    let authors = if result.authors.is_empty() {
        UNKNOWN_AUTHORS.to_string()
    } else {
        result.authors.join(", ")
    };
    let description = result.description.as_deref().unwrap_or(NO_DESCRIPTION);

    format!(
        "{}\nAuthor(s): {}\nDescription: {}",
        title, authors, description
    )
}

/// Text for the scan-result region
pub fn render_detection(code: &str) -> String {
    format!("Barcode detected: {}", code)
}
