//! Shared fixtures for scanner integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use shelfscan::mock::{MockBarcodeDecoder, MockMediaDevices};
use shelfscan::*;
use std::sync::Arc;
use std::time::Duration;

pub const ISBN: &str = "9780140328721";

pub const MR_FOX_JSON: &str = r#"{
    "title": "Fantastic Mr. Fox",
    "authors": [{"key": "/authors/OL34184A"}],
    "description": "A fox outwits three farmers."
}"#;

pub const MR_FOX_RENDERED: &str =
    "Fantastic Mr. Fox\nAuthor(s): /authors/OL34184A\nDescription: A fox outwits three farmers.";

/// Catalog transport answering every request with one canned response
pub struct StubCatalog {
    response: HttpResponse,
    urls: Mutex<Vec<String>>,
}

impl StubCatalog {
    pub fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            response: HttpResponse::new(status, body.as_bytes().to_vec()),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.urls.lock().len()
    }

    pub fn client(self: &Arc<Self>) -> CatalogClient {
        CatalogClient::with_fetcher(&CatalogConfig::default(), self.clone()).unwrap()
    }
}

#[async_trait]
impl HttpFetch for StubCatalog {
    async fn get(&self, url: &str) -> CatalogResult<HttpResponse> {
        self.urls.lock().push(url.to_string());
        Ok(self.response.clone())
    }
}

/// Everything a controller test needs to poke at
pub struct Harness {
    pub controller: ScanController,
    pub devices: Arc<MockMediaDevices>,
    pub decoder: Arc<MockBarcodeDecoder>,
    pub catalog: Arc<StubCatalog>,
    pub page: Arc<TextPage>,
}

impl Harness {
    pub fn new(config: ScanConfig, devices: MockMediaDevices, catalog: Arc<StubCatalog>) -> Self {
        let devices = Arc::new(devices);
        let decoder = Arc::new(MockBarcodeDecoder::new());
        let page = Arc::new(TextPage::new());
        let controller = ScanController::builder(config)
            .media_devices(devices.clone())
            .decoder(decoder.clone())
            .catalog(catalog.client())
            .page(page.clone())
            .build()
            .unwrap();

        Self {
            controller,
            devices,
            decoder,
            catalog,
            page,
        }
    }

    /// Phone cameras and a catalog that knows Fantastic Mr. Fox
    pub fn phone(mode: DetectMode) -> Self {
        Self::new(
            ScanConfig::default().detect_mode(mode),
            MockMediaDevices::phone(),
            StubCatalog::new(200, MR_FOX_JSON),
        )
    }
}

/// Wait for the first event matching `pred`
pub async fn wait_for<F>(events: &mut EventStream, mut pred: F) -> ScanEvent
where
    F: FnMut(&ScanEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.next().await {
                Some(event) if pred(&event) => return event,
                Some(_) => continue,
                None => panic!("event stream closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for scanner event")
}
