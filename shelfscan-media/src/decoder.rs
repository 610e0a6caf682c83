//! Barcode decoder seam
//!
//! Decoding itself belongs to an external library. This module describes how
//! that library is configured and wraps its callback style into an awaitable
//! [`BarcodeDecoder::init`] plus a cancellable [`DetectionSubscription`].

use crate::constraints::VideoResolution;
use crate::error::{MediaError, MediaResult};
use crate::stream::DisplaySurface;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Barcode encodings the decoder is asked to recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Ean13,
    UpcA,
    Code128,
    Code39,
    Interleaved2of5,
}

impl Symbology {
    /// Reader name used by the decoder library
    pub fn reader_name(&self) -> &'static str {
        match self {
            Symbology::Ean13 => "ean_reader",
            Symbology::UpcA => "upc_reader",
            Symbology::Code128 => "code_128_reader",
            Symbology::Code39 => "code_39_reader",
            Symbology::Interleaved2of5 => "i2of5_reader",
        }
    }

    /// Default reader set for book and retail barcodes
    pub fn book_readers() -> Vec<Symbology> {
        vec![
            Symbology::Ean13,
            Symbology::UpcA,
            Symbology::Code128,
            Symbology::Code39,
            Symbology::Interleaved2of5,
        ]
    }
}

/// Locator patch size; smaller patches find smaller barcodes at more cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchSize {
    XSmall,
    Small,
    Medium,
    Large,
    XLarge,
}

/// Barcode locator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    pub patch_size: PatchSize,
    /// Locate on frames down-sampled to half resolution
    pub half_sample: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            patch_size: PatchSize::XSmall,
            half_sample: true,
        }
    }
}

/// Kind of input fed to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputStreamType {
    LiveStream,
}

/// Decoder input description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputStreamConfig {
    pub name: String,
    pub stream_type: InputStreamType,
    pub ideal_resolution: VideoResolution,
}

impl Default for InputStreamConfig {
    fn default() -> Self {
        Self {
            name: "Live".to_string(),
            stream_type: InputStreamType::LiveStream,
            ideal_resolution: VideoResolution::HD,
        }
    }
}

/// Full decoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub input: InputStreamConfig,
    pub readers: Vec<Symbology>,
    pub locate: bool,
    pub locator: LocatorConfig,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            input: InputStreamConfig::default(),
            readers: Symbology::book_readers(),
            locate: true,
            locator: LocatorConfig::default(),
        }
    }
}

impl DecoderConfig {
    /// Validate configuration
    pub fn validate(&self) -> MediaResult<()> {
        if self.readers.is_empty() {
            return Err(MediaError::InvalidConfiguration {
                message: "at least one barcode reader is required".to_string(),
            });
        }

        if self.input.ideal_resolution.is_empty() {
            return Err(MediaError::InvalidConfiguration {
                message: "Invalid resolution".to_string(),
            });
        }

        Ok(())
    }

    /// Reader names in the order they are tried
    pub fn reader_names(&self) -> Vec<&'static str> {
        self.readers.iter().map(|r| r.reader_name()).collect()
    }
}

/// A decoded barcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedCode {
    pub value: String,
    /// Encoding, when the decoder reports it
    pub symbology: Option<Symbology>,
}

impl ScannedCode {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            symbology: None,
        }
    }
}

/// External barcode decoder.
///
/// Implementations run their own per-frame loop between [`start`] and
/// [`stop`] and publish every detection to current subscribers.
///
/// [`start`]: BarcodeDecoder::start
/// [`stop`]: BarcodeDecoder::stop
#[async_trait]
pub trait BarcodeDecoder: Send + Sync {
    /// Configure the decoder against a display surface
    async fn init(&self, config: &DecoderConfig, target: Arc<dyn DisplaySurface>) -> MediaResult<()>;

    /// Start the live detection loop
    fn start(&self);

    /// Stop the detection loop. Must be idempotent.
    fn stop(&self);

    /// Whether the detection loop is running
    fn is_running(&self) -> bool;

    /// Subscribe to detection events
    fn subscribe(&self) -> DetectionSubscription;
}

/// Fan-out of detections for decoder implementations
#[derive(Debug, Clone)]
pub struct DetectionHub {
    tx: broadcast::Sender<ScannedCode>,
}

impl DetectionHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Deliver a detection; returns the number of subscribers reached
    pub fn publish(&self, code: ScannedCode) -> usize {
        self.tx.send(code).unwrap_or(0)
    }

    pub fn subscribe(&self) -> DetectionSubscription {
        DetectionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for DetectionHub {
    fn default() -> Self {
        Self::new(16)
    }
}

/// Cancellable subscription to detection events; dropping it unsubscribes
#[derive(Debug)]
pub struct DetectionSubscription {
    rx: broadcast::Receiver<ScannedCode>,
}

impl DetectionSubscription {
    /// Wait for the next detection. `None` once the decoder is gone.
    pub async fn next(&mut self) -> Option<ScannedCode> {
        loop {
            match self.rx.recv().await {
                Ok(code) => {
                    debug!("Detection received: {}", code.value);
                    return Some(code);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Skipped {} detection(s) while busy", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}
