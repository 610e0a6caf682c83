//! Camera and decoder error types
//!
//! Every failure the capture side of a scan can produce is expressed as a
//! [`MediaError`], so callers can decide between aborting the scan attempt and
//! retrying without inspecting backend-specific error strings.

use thiserror::Error;

/// Main error type for camera acquisition and decoder operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The platform refused camera access
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// Operation that was denied
        operation: String,
    },

    /// No matching camera, or the camera is held by someone else
    #[error("Device unavailable: {reason}")]
    DeviceUnavailable {
        /// Failure reason
        reason: String,
    },

    /// Listing media devices failed
    #[error("Device enumeration failed: {reason}")]
    DeviceEnumerationFailed {
        /// Failure reason
        reason: String,
    },

    /// External barcode decoder refused its configuration
    #[error("Decoder initialization failed: {reason}")]
    DecoderInit {
        /// Failure reason
        reason: String,
    },

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Operation not allowed in the current session state
    #[error("Invalid state: {message}")]
    InvalidState {
        /// State error message
        message: String,
    },
}

/// Result type alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;

impl MediaError {
    /// Check if error is recoverable by simply trying again later
    pub fn is_recoverable(&self) -> bool {
        match self {
            MediaError::DeviceUnavailable { .. } => true,
            MediaError::DeviceEnumerationFailed { .. } => true,
            MediaError::InvalidState { .. } => true,
            MediaError::PermissionDenied { .. } => false,
            MediaError::DecoderInit { .. } => false,
            MediaError::InvalidConfiguration { .. } => false,
        }
    }

    /// Get error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            MediaError::PermissionDenied { .. } => ErrorCategory::Permission,
            MediaError::DeviceUnavailable { .. } => ErrorCategory::Device,
            MediaError::DeviceEnumerationFailed { .. } => ErrorCategory::Device,
            MediaError::DecoderInit { .. } => ErrorCategory::Decoder,
            MediaError::InvalidConfiguration { .. } => ErrorCategory::Configuration,
            MediaError::InvalidState { .. } => ErrorCategory::State,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User or platform refused access
    Permission,
    /// Camera hardware errors
    Device,
    /// External decoder errors
    Decoder,
    /// Configuration and parameter errors
    Configuration,
    /// State management errors
    State,
}

/// Helper trait for converting backend-specific errors
pub trait IntoMediaError {
    fn into_media_error(self, context: &str) -> MediaError;
}

impl IntoMediaError for String {
    fn into_media_error(self, context: &str) -> MediaError {
        classify_backend_message(context, &self)
    }
}

/// Backends only report free-form text; permission refusals are recognised
/// by wording, everything else counts as an unavailable device.
fn classify_backend_message(context: &str, message: &str) -> MediaError {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("permission") || lowered.contains("not allowed") || lowered.contains("denied") {
        MediaError::PermissionDenied {
            operation: format!("{}: {}", context, message),
        }
    } else {
        MediaError::DeviceUnavailable {
            reason: format!("{}: {}", context, message),
        }
    }
}
