//! Catalog lookup error types

use thiserror::Error;

/// Failures of a single catalog request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Request never produced a response
    #[error("Transport error: {reason}")]
    Transport {
        /// Reason for transport error
        reason: String,
    },

    /// Catalog answered with a non-success status
    #[error("Book not found (status: {status})")]
    NotFound {
        /// HTTP status code
        status: u16,
    },

    /// Response body was not a catalog record
    #[error("Unreadable catalog response: {reason}")]
    Parse {
        /// Parser message
        reason: String,
    },

    /// The request could not be built
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// What was wrong with it
        reason: String,
    },
}

/// Result type alias for lookup operations
pub type CatalogResult<T> = Result<T, LookupError>;

impl LookupError {
    /// Whether the catalog itself reported the book as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::Parse {
            reason: e.to_string(),
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::Transport {
            reason: e.to_string(),
        }
    }
}
