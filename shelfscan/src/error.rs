//! Error taxonomy for scanner operations

use shelfscan_lookup::LookupError;
use shelfscan_media::MediaError;
use thiserror::Error;

/// Main error type for shelfscan operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Camera access refused
    #[error("Camera permission denied: {reason}")]
    PermissionDenied {
        /// Reason reported by the platform
        reason: String,
    },

    /// No matching camera, or the camera is busy
    #[error("Camera unavailable: {reason}")]
    DeviceUnavailable {
        /// Reason reported by the platform
        reason: String,
    },

    /// Barcode decoder refused its configuration
    #[error("Barcode decoder failed to initialize: {reason}")]
    DecoderInit {
        /// Reason reported by the decoder
        reason: String,
    },

    /// Catalog lookup failed or found nothing
    #[error("Book lookup failed: {reason}")]
    NetworkOrNotFound {
        /// Reason for lookup failure
        reason: String,
    },

    /// Manual input rejected before any request was made
    #[error("Invalid input: {message}")]
    InputValidation {
        /// What was wrong with the input
        message: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Other camera-side failure
    #[error("Media error: {source}")]
    Media {
        /// Underlying media error
        source: MediaError,
    },
}

impl ScanError {
    /// Whether the failure came from the camera or decoder side
    pub fn is_capture_error(&self) -> bool {
        matches!(
            self,
            ScanError::PermissionDenied { .. }
                | ScanError::DeviceUnavailable { .. }
                | ScanError::DecoderInit { .. }
                | ScanError::Media { .. }
        )
    }
}

impl From<MediaError> for ScanError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::PermissionDenied { operation } => ScanError::PermissionDenied { reason: operation },
            MediaError::DeviceUnavailable { reason } => ScanError::DeviceUnavailable { reason },
            MediaError::DecoderInit { reason } => ScanError::DecoderInit { reason },
            MediaError::InvalidConfiguration { message } => ScanError::Configuration { message },
            other => ScanError::Media { source: other },
        }
    }
}

impl From<LookupError> for ScanError {
    fn from(e: LookupError) -> Self {
        ScanError::NetworkOrNotFound {
            reason: e.to_string(),
        }
    }
}
