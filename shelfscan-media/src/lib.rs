//! # shelfscan media
//!
//! Camera selection, stream ownership and the barcode decoder seam for
//! shelfscan. Decoding and camera drivers are external; this crate decides
//! which camera to ask for, owns the resulting stream and guarantees that
//! every hardware track is stopped on release.

#![warn(clippy::all)]

pub mod capture;
pub mod constraints;
pub mod decoder;
pub mod devices;
pub mod error;
pub mod mock;
pub mod stream;
pub mod tracks;

// Re-export main types
pub use capture::{default_media_devices, MediaDevices};
pub use constraints::{
    FacingMode, FacingModeConstraint, FacingModeStrategy, StreamConstraints, VideoResolution,
};
pub use decoder::{
    BarcodeDecoder, DecoderConfig, DetectionHub, DetectionSubscription, InputStreamConfig,
    InputStreamType, LocatorConfig, PatchSize, ScannedCode, Symbology,
};
pub use devices::{constraints_for_devices, CameraDevice, DeviceEnumerator, DeviceKind, SelectionOptions};
pub use error::{ErrorCategory, MediaError, MediaResult};
pub use stream::{DisplaySurface, SessionState, StreamHandle, StreamSession, VideoSurface};
pub use tracks::{FrameReceiver, MediaTrack, TrackKind, VideoFrame};
