//! Stream constraint types

use serde::{Deserialize, Serialize};

/// Video resolution information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoResolution {
    pub width: u32,
    pub height: u32,
}

impl VideoResolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const HD: Self = Self::new(1280, 720);

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for VideoResolution {
    fn default() -> Self {
        Self::HD
    }
}

/// Camera orientation hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera, pointing away from the user
    Environment,
    /// Front camera, pointing at the user
    User,
}

/// Facing-mode constraint as passed to the camera backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingModeConstraint {
    /// Soft preference; the backend may pick another camera
    Ideal(FacingMode),
    /// Hard requirement; acquisition fails without a matching camera
    Exact(FacingMode),
}

impl FacingModeConstraint {
    pub fn mode(&self) -> FacingMode {
        match self {
            FacingModeConstraint::Ideal(mode) | FacingModeConstraint::Exact(mode) => *mode,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, FacingModeConstraint::Exact(_))
    }
}

/// How the environment-facing hint is applied when building constraints.
///
/// Deployed pages disagree here: one demands an exact rear camera on every
/// request, which fails outright on laptops, another only adds a soft hint
/// when no rear camera could be identified by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingModeStrategy {
    /// Never send a facing-mode hint
    Omit,
    /// Soft environment hint when no rear camera was found by label
    #[default]
    Ideal,
    /// Exact environment requirement on every request
    Exact,
}

/// Constraints for one camera acquisition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConstraints {
    /// Device pinned with an exact id match
    pub preferred_device_id: Option<String>,
    /// Ideal width in pixels
    pub ideal_width: u32,
    /// Ideal height in pixels
    pub ideal_height: u32,
    /// Optional orientation hint
    pub facing_mode: Option<FacingModeConstraint>,
}

impl StreamConstraints {
    /// Constraints with only an ideal resolution, like a plain `{video: true}` request
    pub fn with_resolution(resolution: VideoResolution) -> Self {
        Self {
            preferred_device_id: None,
            ideal_width: resolution.width,
            ideal_height: resolution.height,
            facing_mode: None,
        }
    }

    pub fn ideal_resolution(&self) -> VideoResolution {
        VideoResolution::new(self.ideal_width, self.ideal_height)
    }

    pub fn pins_device(&self) -> bool {
        self.preferred_device_id.is_some()
    }
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self::with_resolution(VideoResolution::HD)
    }
}
