//! # shelfscan lookup
//!
//! Book metadata lookups against an Open Library style catalog and their
//! rendering into display text. A lookup never fails from the caller's
//! point of view: transport errors, non-success statuses and unreadable
//! bodies all come back as a not-found [`LookupResult`].

#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod fetch;
pub mod model;
pub mod presenter;

// Re-export main types
pub use client::{CatalogClient, CatalogConfig, DEFAULT_CATALOG_URL};
pub use error::{CatalogResult, LookupError};
pub use fetch::{HttpFetch, HttpResponse, ReqwestFetcher};
pub use model::{AuthorRef, BookRecord, Description, LookupResult};
pub use presenter::{render, render_detection};
