//! Catalog lookup client

use crate::error::{CatalogResult, LookupError};
use crate::fetch::{HttpFetch, ReqwestFetcher};
use crate::model::{BookRecord, LookupResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Public Open Library endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org";

/// Catalog endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL; records are fetched from `{base_url}/isbn/{isbn}.json`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse and check the base URL
    pub fn parsed_base_url(&self) -> CatalogResult<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| LookupError::InvalidRequest {
            reason: format!("invalid catalog URL {}: {}", self.base_url, e),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(LookupError::InvalidRequest {
                reason: format!(
                    "Invalid URL scheme. Only http:// and https:// are supported: {}",
                    self.base_url
                ),
            });
        }
        if url.cannot_be_a_base() {
            return Err(LookupError::InvalidRequest {
                reason: format!("catalog URL cannot be a base: {}", self.base_url),
            });
        }
        Ok(url)
    }
}

/// Looks up books by ISBN with one GET per call
#[derive(Clone)]
pub struct CatalogClient {
    base_url: Url,
    fetcher: Arc<dyn HttpFetch>,
}

impl CatalogClient {
    /// Client talking to the configured endpoint over reqwest
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let fetcher = ReqwestFetcher::new(config.timeout())?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Client using a caller-supplied transport
    pub fn with_fetcher(config: &CatalogConfig, fetcher: Arc<dyn HttpFetch>) -> CatalogResult<Self> {
        Ok(Self {
            base_url: config.parsed_base_url()?,
            fetcher,
        })
    }

    /// URL of the record for `isbn`; the code is escaped as one path segment
    pub fn record_url(&self, isbn: &str) -> CatalogResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidRequest {
                reason: "catalog URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push("isbn")
            .push(&format!("{}.json", isbn));
        Ok(url)
    }

    /// Fetch and parse the record, reporting every failure
    pub async fn fetch_record(&self, isbn: &str) -> CatalogResult<BookRecord> {
        if isbn.trim().is_empty() {
            return Err(LookupError::InvalidRequest {
                reason: "empty ISBN".to_string(),
            });
        }

        let url = self.record_url(isbn)?;
        let response = self.fetcher.get(url.as_str()).await?;
        if !response.is_success() {
            return Err(LookupError::NotFound {
                status: response.status,
            });
        }

        let record = BookRecord::from_json(&response.body)?;
        debug!("Catalog record for {}: {:?}", isbn, record.title);
        Ok(record)
    }

    /// Look up `isbn`; failures become a not-found result
    pub async fn lookup(&self, isbn: &str) -> LookupResult {
        match self.fetch_record(isbn).await {
            Ok(record) => {
                info!("📚 Found catalog record for {}", isbn);
                LookupResult::from_record(isbn, record)
            }
            Err(e) => {
                warn!("Error fetching book details for {}: {}", isbn, e);
                LookupResult::not_found(isbn)
            }
        }
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HttpResponse;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl HttpFetch for Unreachable {
        async fn get(&self, _url: &str) -> CatalogResult<HttpResponse> {
            Err(LookupError::Transport {
                reason: "connection refused".to_string(),
            })
        }
    }

    fn client(base_url: &str) -> CatalogClient {
        let config = CatalogConfig {
            base_url: base_url.to_string(),
            ..CatalogConfig::default()
        };
        CatalogClient::with_fetcher(&config, Arc::new(Unreachable)).unwrap()
    }

    #[test]
    fn test_record_url() {
        let url = client("https://openlibrary.org").record_url("9780140328721").unwrap();
        assert_eq!(url.as_str(), "https://openlibrary.org/isbn/9780140328721.json");

        let nested = client("http://localhost:8080/catalog/").record_url("123").unwrap();
        assert_eq!(nested.as_str(), "http://localhost:8080/catalog/isbn/123.json");
    }

    #[test]
    fn test_record_url_escapes_code() {
        let url = client("https://openlibrary.org").record_url("12/34?x").unwrap();
        assert_eq!(url.as_str(), "https://openlibrary.org/isbn/12%2F34%3Fx.json");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let config = CatalogConfig {
            base_url: "ftp://example.org".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(
            config.parsed_base_url(),
            Err(LookupError::InvalidRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let result = client("https://openlibrary.org").lookup("9780140328721").await;
        assert!(!result.found);
        assert_eq!(result.isbn, "9780140328721");
    }
}
