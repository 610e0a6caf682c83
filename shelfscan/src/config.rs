//! Configuration types and defaults

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use shelfscan_lookup::CatalogConfig;
use shelfscan_media::{
    DecoderConfig, FacingModeStrategy, InputStreamConfig, LocatorConfig, SelectionOptions,
    Symbology, VideoResolution,
};

/// What the scanner does with each detected code.
///
/// Deployed revisions of the scanner page behave differently here and no
/// single behaviour is authoritative, so each is selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectMode {
    /// Show the code, stop the decoder and release the camera; no lookup
    StopOnly,
    /// Show every code and keep scanning; no lookup
    DisplayOnly,
    /// Show the code, stop and release, then look the book up once
    #[default]
    LookupOnce,
    /// Look up and redisplay every detection while scanning continues
    ContinuousLookup,
}

impl DetectMode {
    /// Whether a detection ends the scan session
    pub fn stops_on_detect(&self) -> bool {
        matches!(self, DetectMode::StopOnly | DetectMode::LookupOnce)
    }

    /// Whether a detection triggers a catalog lookup
    pub fn looks_up(&self) -> bool {
        matches!(self, DetectMode::LookupOnce | DetectMode::ContinuousLookup)
    }
}

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Detection handling
    pub detect_mode: DetectMode,
    /// Facing-mode hint policy for camera selection
    pub facing_mode: FacingModeStrategy,
    /// Ideal capture resolution
    pub ideal_resolution: VideoResolution,
    /// Barcode symbologies handed to the decoder
    pub readers: Vec<Symbology>,
    /// Decoder locator settings
    pub locator: LocatorConfig,
    /// Catalog endpoint
    pub catalog: CatalogConfig,
    /// Enable debug logging
    pub debug_logging: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            detect_mode: DetectMode::default(),
            facing_mode: FacingModeStrategy::default(),
            ideal_resolution: VideoResolution::HD,
            readers: Symbology::book_readers(),
            locator: LocatorConfig::default(),
            catalog: CatalogConfig::default(),
            debug_logging: false,
        }
    }
}

impl ScanConfig {
    /// Load a configuration from JSON; missing fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ScanError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ScanError::Configuration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.ideal_resolution.is_empty() {
            return Err(ScanError::Configuration {
                message: "Invalid resolution".to_string(),
            });
        }
        self.decoder_config().validate()?;
        self.catalog
            .parsed_base_url()
            .map_err(|e| ScanError::Configuration {
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Set detection handling
    pub fn detect_mode(mut self, mode: DetectMode) -> Self {
        self.detect_mode = mode;
        self
    }

    /// Set facing-mode hint policy
    pub fn facing_mode(mut self, strategy: FacingModeStrategy) -> Self {
        self.facing_mode = strategy;
        self
    }

    /// Set catalog base URL
    pub fn catalog_url(mut self, url: &str) -> Self {
        self.catalog.base_url = url.to_string();
        self
    }

    /// Enable debug logging
    pub fn with_debug_logging(mut self) -> Self {
        self.debug_logging = true;
        self
    }

    /// Options for camera constraint selection
    pub fn selection_options(&self) -> SelectionOptions {
        SelectionOptions {
            ideal_resolution: self.ideal_resolution,
            facing_mode: self.facing_mode,
        }
    }

    /// Decoder configuration for a live scan
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            input: InputStreamConfig {
                ideal_resolution: self.ideal_resolution,
                ..InputStreamConfig::default()
            },
            readers: self.readers.clone(),
            locate: true,
            locator: self.locator,
        }
    }
}
