//! Native camera backend built on nokhwa
//!
//! Each opened stream runs on its own OS thread that owns the camera, since
//! nokhwa camera handles are not `Send`. The track talks to that thread
//! through an atomic stop flag and publishes decoded RGB frames on a watch
//! channel for whatever decoder is attached.

use super::MediaDevices;
use crate::constraints::{FacingMode, StreamConstraints};
use crate::devices::CameraDevice;
use crate::error::{IntoMediaError, MediaError, MediaResult};
use crate::stream::StreamHandle;
use crate::tracks::{FrameReceiver, MediaTrack, TrackKind, VideoFrame};
use async_trait::async_trait;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

const CAPTURE_FPS: u32 = 30;

/// nokhwa-backed [`MediaDevices`]
#[derive(Debug, Default)]
pub struct NativeMediaDevices;

impl NativeMediaDevices {
    pub fn new() -> Self {
        Self
    }

    fn query_blocking() -> MediaResult<Vec<CameraDevice>> {
        let cameras = nokhwa::query(ApiBackend::Auto).map_err(|e| {
            MediaError::DeviceEnumerationFailed {
                reason: e.to_string(),
            }
        })?;
        Ok(cameras
            .into_iter()
            .map(|info| CameraDevice::video(info.index().to_string(), info.human_name()))
            .collect())
    }
}

fn parse_index(id: &str) -> CameraIndex {
    match id.parse::<u32>() {
        Ok(index) => CameraIndex::Index(index),
        Err(_) => CameraIndex::String(id.to_string()),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[async_trait]
impl MediaDevices for NativeMediaDevices {
    async fn enumerate_devices(&self) -> MediaResult<Vec<CameraDevice>> {
        tokio::task::spawn_blocking(Self::query_blocking)
            .await
            .map_err(|e| MediaError::DeviceEnumerationFailed {
                reason: e.to_string(),
            })?
    }

    async fn get_user_media(&self, constraints: &StreamConstraints) -> MediaResult<StreamHandle> {
        let device_id = match &constraints.preferred_device_id {
            Some(id) => id.clone(),
            None => {
                let devices = self.enumerate_devices().await?;
                let wants_rear = constraints
                    .facing_mode
                    .map(|f| f.is_exact() && f.mode() == FacingMode::Environment)
                    .unwrap_or(false);
                let chosen = if wants_rear {
                    devices.iter().find(|d| d.looks_rear_facing())
                } else {
                    devices.first()
                };
                match chosen {
                    Some(device) => device.id.clone(),
                    None if wants_rear => {
                        return Err(MediaError::DeviceUnavailable {
                            reason: "no environment-facing camera".to_string(),
                        })
                    }
                    None => {
                        return Err(MediaError::DeviceUnavailable {
                            reason: "no camera found".to_string(),
                        })
                    }
                }
            }
        };

        let resolution = Resolution::new(constraints.ideal_width, constraints.ideal_height);
        let (frames_tx, frames_rx) = watch::channel(None);
        let stop = Arc::new(AtomicBool::new(false));
        let live = Arc::new(AtomicBool::new(false));
        let (opened_tx, opened_rx) = oneshot::channel::<Result<(), String>>();

        let thread_stop = stop.clone();
        let thread_live = live.clone();
        let index = parse_index(&device_id);
        std::thread::Builder::new()
            .name(format!("camera-{}", device_id))
            .spawn(move || {
                let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
                    CameraFormat::new(resolution, FrameFormat::MJPEG, CAPTURE_FPS),
                ));
                let mut camera = match Camera::new(index, format).and_then(|mut camera| {
                    camera.open_stream()?;
                    Ok(camera)
                }) {
                    Ok(camera) => camera,
                    Err(e) => {
                        let _ = opened_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                thread_live.store(true, Ordering::SeqCst);
                let _ = opened_tx.send(Ok(()));

                while !thread_stop.load(Ordering::SeqCst) {
                    let frame = camera
                        .frame()
                        .and_then(|buffer| buffer.decode_image::<RgbFormat>());
                    match frame {
                        Ok(image) => {
                            let frame = VideoFrame {
                                width: image.width(),
                                height: image.height(),
                                data: image.into_raw(),
                                timestamp: now_millis(),
                            };
                            if frame.is_complete() {
                                let _ = frames_tx.send(Some(frame));
                            } else {
                                debug!(
                                    "Dropping short frame ({} of {} bytes)",
                                    frame.data.len(),
                                    frame.expected_rgb_len()
                                );
                            }
                        }
                        Err(e) => {
                            warn!("Camera frame read failed, closing stream: {}", e);
                            break;
                        }
                    }
                }

                if let Err(e) = camera.stop_stream() {
                    warn!("Camera did not stop cleanly: {}", e);
                }
                thread_live.store(false, Ordering::SeqCst);
                debug!("Camera thread exited");
            })
            .map_err(|e| MediaError::DeviceUnavailable {
                reason: e.to_string(),
            })?;

        match opened_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(message)) => return Err(message.into_media_error("open camera")),
            Err(_) => {
                return Err(MediaError::DeviceUnavailable {
                    reason: "camera thread exited before opening".to_string(),
                })
            }
        }

        info!("📹 Opened native camera {}", device_id);
        let track = NativeTrack {
            id: format!("video-{}", device_id),
            stop,
            live,
            frames: frames_rx,
        };
        Ok(StreamHandle::new(Some(device_id), vec![Arc::new(track)]))
    }
}

/// Video track owned by a camera thread
#[derive(Debug)]
pub struct NativeTrack {
    id: String,
    stop: Arc<AtomicBool>,
    live: Arc<AtomicBool>,
    frames: FrameReceiver,
}

impl MediaTrack for NativeTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        TrackKind::Video
    }

    fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        !self.stop.load(Ordering::SeqCst) && self.live.load(Ordering::SeqCst)
    }

    fn frames(&self) -> Option<FrameReceiver> {
        Some(self.frames.clone())
    }
}
