//! Display regions of the scanner page

use parking_lot::RwLock;

/// The user-facing page: a scan-result line, a book-info panel and a
/// blocking alert for input errors.
pub trait Page: Send + Sync {
    fn show_scan_result(&self, text: &str);

    fn show_book_info(&self, text: &str);

    fn alert(&self, message: &str);
}

#[derive(Debug, Default)]
struct TextPageState {
    scan_result: String,
    book_info: String,
    alerts: Vec<String>,
}

/// In-memory page keeping the latest text of each region
#[derive(Debug, Default)]
pub struct TextPage {
    state: RwLock<TextPageState>,
}

impl TextPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan_result(&self) -> String {
        self.state.read().scan_result.clone()
    }

    pub fn book_info(&self) -> String {
        self.state.read().book_info.clone()
    }

    /// Every alert raised so far, oldest first
    pub fn alerts(&self) -> Vec<String> {
        self.state.read().alerts.clone()
    }
}

impl Page for TextPage {
    fn show_scan_result(&self, text: &str) {
        self.state.write().scan_result = text.to_string();
    }

    fn show_book_info(&self, text: &str) {
        self.state.write().book_info = text.to_string();
    }

    fn alert(&self, message: &str) {
        self.state.write().alerts.push(message.to_string());
    }
}
