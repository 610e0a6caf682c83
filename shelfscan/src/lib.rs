//! # shelfscan - scan a book's barcode, show the book
//!
//! shelfscan points a camera at a book's barcode, hands the live feed to an
//! external barcode decoder and looks the detected ISBN up in an Open Library
//! style catalog. ISBNs can also be typed in by hand.
//!
//! ## Key Features
//!
//! - **One stream at a time**: the controller owns the only camera stream and
//!   stops every hardware track when a scan ends
//! - **Rear camera first**: cameras labelled back/rear/environment are pinned,
//!   other devices fall back to a configurable facing-mode hint
//! - **Configurable detection handling**: stop, display, look up once or look
//!   up continuously
//! - **Lookups never fail**: network and catalog errors render a placeholder
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shelfscan::{mock::MockBarcodeDecoder, ScanConfig, ScanController, TextPage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     shelfscan::init_logging(false);
//!
//!     let page = Arc::new(TextPage::new());
//!     let controller = ScanController::builder(ScanConfig::default())
//!         .media_devices(shelfscan::default_media_devices()?)
//!         .decoder(Arc::new(MockBarcodeDecoder::new()))
//!         .page(page.clone())
//!         .build()?;
//!
//!     controller.start_scan().await?;
//!     controller.wait_for_detection().await;
//!     println!("{}", page.book_info());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

// Re-export media and lookup types for easy access
pub use shelfscan_lookup::{
    render, render_detection, BookRecord, CatalogClient, CatalogConfig, CatalogResult, HttpFetch,
    HttpResponse, LookupError, LookupResult, ReqwestFetcher,
};
pub use shelfscan_media::{
    default_media_devices, mock, BarcodeDecoder, CameraDevice, DecoderConfig, DisplaySurface,
    FacingMode, FacingModeConstraint, FacingModeStrategy, MediaDevices, MediaError, ScannedCode,
    SessionState, StreamConstraints, Symbology, VideoResolution, VideoSurface,
};

// Public API modules
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod logging;
pub mod manual;
pub mod page;

// Re-export main API types
pub use config::{DetectMode, ScanConfig};
pub use controller::{ScanController, ScanControllerBuilder};
pub use error::ScanError;
pub use event::{EventStream, ScanEvent};
pub use logging::init_logging;
pub use manual::{ManualEntry, EMPTY_ISBN_ALERT};
pub use page::{Page, TextPage};
