//! Camera device enumeration and constraint selection

use crate::capture::MediaDevices;
use crate::constraints::{
    FacingMode, FacingModeConstraint, FacingModeStrategy, StreamConstraints, VideoResolution,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Label fragments that identify a rear-facing camera
const REAR_CAMERA_HINTS: [&str; 3] = ["back", "environment", "rear"];

/// Kind of media input device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    Other,
}

/// Media device information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDevice {
    /// Opaque device id
    pub id: String,
    /// Human-readable label; empty until the user has granted camera access
    pub label: String,
    /// Device kind
    pub kind: DeviceKind,
}

impl CameraDevice {
    pub fn video(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: DeviceKind::VideoInput,
        }
    }

    pub fn is_video_input(&self) -> bool {
        self.kind == DeviceKind::VideoInput
    }

    /// Whether the label suggests a rear-facing camera
    pub fn looks_rear_facing(&self) -> bool {
        let label = self.label.to_lowercase();
        REAR_CAMERA_HINTS.iter().any(|hint| label.contains(hint))
    }
}

/// Options that shape constraint selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionOptions {
    pub ideal_resolution: VideoResolution,
    pub facing_mode: FacingModeStrategy,
}

/// Build constraints for an already enumerated device list.
///
/// A rear camera found by label is pinned by id; otherwise no id is ever
/// pinned and only the resolution and the configured facing hint remain.
pub fn constraints_for_devices(
    devices: &[CameraDevice],
    options: &SelectionOptions,
) -> StreamConstraints {
    let mut constraints = StreamConstraints::with_resolution(options.ideal_resolution);

    let rear = devices
        .iter()
        .filter(|device| device.is_video_input())
        .find(|device| device.looks_rear_facing());

    match rear {
        Some(device) => {
            debug!("Pinning rear camera '{}' ({})", device.label, device.id);
            constraints.preferred_device_id = Some(device.id.clone());
            if options.facing_mode == FacingModeStrategy::Exact {
                constraints.facing_mode = Some(FacingModeConstraint::Exact(FacingMode::Environment));
            }
        }
        None => {
            constraints.facing_mode = match options.facing_mode {
                FacingModeStrategy::Omit => None,
                FacingModeStrategy::Ideal => {
                    Some(FacingModeConstraint::Ideal(FacingMode::Environment))
                }
                FacingModeStrategy::Exact => {
                    Some(FacingModeConstraint::Exact(FacingMode::Environment))
                }
            };
        }
    }

    constraints
}

/// Lists cameras through a [`MediaDevices`] backend and picks constraints
pub struct DeviceEnumerator {
    backend: Arc<dyn MediaDevices>,
    options: SelectionOptions,
}

impl DeviceEnumerator {
    pub fn new(backend: Arc<dyn MediaDevices>, options: SelectionOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    /// Enumerate video inputs afresh; nothing is cached between scans
    pub async fn video_inputs(&self) -> Vec<CameraDevice> {
        match self.backend.enumerate_devices().await {
            Ok(devices) => devices.into_iter().filter(|d| d.is_video_input()).collect(),
            Err(e) => {
                // Acquisition will surface the real failure
                warn!("Device enumeration failed, using default constraints: {}", e);
                Vec::new()
            }
        }
    }

    /// Pick constraints for the next acquisition
    pub async fn select_constraints(&self) -> StreamConstraints {
        let devices = self.video_inputs().await;
        let constraints = constraints_for_devices(&devices, &self.options);
        info!(
            "🎯 Selected constraints from {} camera(s): device={:?} facing={:?}",
            devices.len(),
            constraints.preferred_device_id,
            constraints.facing_mode
        );
        constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(facing_mode: FacingModeStrategy) -> SelectionOptions {
        SelectionOptions {
            ideal_resolution: VideoResolution::HD,
            facing_mode,
        }
    }

    #[test]
    fn test_rear_labels_match_case_insensitively() {
        for label in ["Back Camera", "camera2 0, facing ENVIRONMENT", "Rear wide"] {
            assert!(CameraDevice::video("id", label).looks_rear_facing(), "{}", label);
        }
        assert!(!CameraDevice::video("id", "FaceTime HD Camera").looks_rear_facing());
        assert!(!CameraDevice::video("id", "").looks_rear_facing());
    }

    #[test]
    fn test_rear_camera_is_pinned() {
        let devices = vec![
            CameraDevice::video("front", "Front Camera"),
            CameraDevice::video("rear-1", "Back Camera"),
        ];
        let constraints = constraints_for_devices(&devices, &options(FacingModeStrategy::Ideal));
        assert_eq!(constraints.preferred_device_id.as_deref(), Some("rear-1"));
        assert_eq!(constraints.ideal_width, 1280);
        assert_eq!(constraints.ideal_height, 720);
        assert_eq!(constraints.facing_mode, None);
    }

    #[test]
    fn test_audio_devices_are_ignored() {
        let devices = vec![CameraDevice {
            id: "mic".to_string(),
            label: "Rear microphone".to_string(),
            kind: DeviceKind::AudioInput,
        }];
        let constraints = constraints_for_devices(&devices, &options(FacingModeStrategy::Omit));
        assert!(!constraints.pins_device());
    }

    #[test]
    fn test_unlabelled_devices_fall_through() {
        let devices = vec![CameraDevice::video("a", ""), CameraDevice::video("b", "")];
        let constraints = constraints_for_devices(&devices, &options(FacingModeStrategy::Ideal));
        assert!(!constraints.pins_device());
        assert_eq!(
            constraints.facing_mode,
            Some(FacingModeConstraint::Ideal(FacingMode::Environment))
        );
    }

    #[test]
    fn test_facing_strategies() {
        let omit = constraints_for_devices(&[], &options(FacingModeStrategy::Omit));
        assert_eq!(omit.facing_mode, None);

        let exact = constraints_for_devices(&[], &options(FacingModeStrategy::Exact));
        assert!(exact.facing_mode.map(|f| f.is_exact()).unwrap_or(false));

        let pinned_exact = constraints_for_devices(
            &[CameraDevice::video("r", "rear")],
            &options(FacingModeStrategy::Exact),
        );
        assert!(pinned_exact.pins_device());
        assert_eq!(
            pinned_exact.facing_mode,
            Some(FacingModeConstraint::Exact(FacingMode::Environment))
        );
    }
}
