#[cfg(feature = "native")]
pub mod native;

use crate::constraints::StreamConstraints;
use crate::devices::CameraDevice;
use crate::error::MediaResult;
use crate::stream::StreamHandle;
use async_trait::async_trait;
use std::sync::Arc;

/// Platform media-capture backend
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// List every media input the process can see. Labels may be empty
    /// before the user has granted camera access.
    async fn enumerate_devices(&self) -> MediaResult<Vec<CameraDevice>>;

    /// Open a camera stream under `constraints`
    async fn get_user_media(&self, constraints: &StreamConstraints) -> MediaResult<StreamHandle>;
}

/// Get the camera backend for this build
pub fn default_media_devices() -> MediaResult<Arc<dyn MediaDevices>> {
    #[cfg(feature = "native")]
    {
        Ok(Arc::new(native::NativeMediaDevices::new()))
    }
    #[cfg(not(feature = "native"))]
    {
        Err(crate::error::MediaError::DeviceUnavailable {
            reason: "built without the `native` camera feature".to_string(),
        })
    }
}
