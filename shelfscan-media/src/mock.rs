//! Scriptable camera and decoder backends for tests and demos
//!
//! These record every interaction (constraints requested, tracks stopped,
//! decoder starts and stops) so scanner lifecycles can be checked without
//! hardware.

use crate::capture::MediaDevices;
use crate::constraints::{FacingMode, StreamConstraints};
use crate::decoder::{BarcodeDecoder, DecoderConfig, DetectionHub, DetectionSubscription, ScannedCode};
use crate::devices::CameraDevice;
use crate::error::{MediaError, MediaResult};
use crate::stream::{DisplaySurface, StreamHandle};
use crate::tracks::{FrameReceiver, MediaTrack, TrackKind, VideoFrame};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Track that counts its `stop()` calls. Video tracks carry a frame
/// channel fed by [`push_frame`](MockTrack::push_frame).
#[derive(Debug)]
pub struct MockTrack {
    id: String,
    kind: TrackKind,
    live: AtomicBool,
    stop_calls: AtomicUsize,
    frames: watch::Sender<Option<VideoFrame>>,
}

impl MockTrack {
    pub fn new(id: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            kind,
            live: AtomicBool::new(true),
            stop_calls: AtomicUsize::new(0),
            frames: watch::channel(None).0,
        }
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// Publish a frame while live; returns whether it was published
    pub fn push_frame(&self, frame: VideoFrame) -> bool {
        if self.kind != TrackKind::Video || !self.is_live() {
            return false;
        }
        self.frames.send_replace(Some(frame));
        true
    }
}

impl MediaTrack for MockTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn frames(&self) -> Option<FrameReceiver> {
        match self.kind {
            TrackKind::Video => Some(self.frames.subscribe()),
            TrackKind::Audio => None,
        }
    }
}

/// Camera backend with a fixed device list and scriptable failures.
///
/// Streams carry one video track, plus an audio track when
/// [`with_audio_tracks`](MockMediaDevices::with_audio_tracks) is set.
#[derive(Debug, Default)]
pub struct MockMediaDevices {
    devices: Mutex<Vec<CameraDevice>>,
    enumeration_failure: Mutex<Option<MediaError>>,
    acquire_failures: Mutex<Vec<MediaError>>,
    audio_tracks: AtomicBool,
    requests: Mutex<Vec<StreamConstraints>>,
    tracks: Mutex<Vec<Arc<MockTrack>>>,
}

impl MockMediaDevices {
    pub fn new(devices: Vec<CameraDevice>) -> Self {
        Self {
            devices: Mutex::new(devices),
            ..Self::default()
        }
    }

    /// A laptop-style device list: one unlabelled front camera
    pub fn laptop() -> Self {
        Self::new(vec![CameraDevice::video("cam-0", "")])
    }

    /// A phone-style device list with front and back cameras
    pub fn phone() -> Self {
        Self::new(vec![
            CameraDevice::video("front-0", "Front Camera"),
            CameraDevice::video("back-0", "Back Camera"),
        ])
    }

    pub fn with_audio_tracks(self) -> Self {
        self.audio_tracks.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_devices(&self, devices: Vec<CameraDevice>) {
        *self.devices.lock() = devices;
    }

    pub fn fail_enumeration(&self, error: MediaError) {
        *self.enumeration_failure.lock() = Some(error);
    }

    /// Queue a failure for the next acquisition
    pub fn fail_next_acquire(&self, error: MediaError) {
        self.acquire_failures.lock().push(error);
    }

    /// Constraints of every acquisition attempt, in order
    pub fn requests(&self) -> Vec<StreamConstraints> {
        self.requests.lock().clone()
    }

    /// Every track ever handed out
    pub fn tracks(&self) -> Vec<Arc<MockTrack>> {
        self.tracks.lock().clone()
    }

    pub fn live_track_count(&self) -> usize {
        self.tracks.lock().iter().filter(|t| t.is_live()).count()
    }

    fn pick_device(&self, constraints: &StreamConstraints) -> MediaResult<Option<String>> {
        let devices = self.devices.lock();
        let videos: Vec<&CameraDevice> = devices.iter().filter(|d| d.is_video_input()).collect();

        if let Some(id) = &constraints.preferred_device_id {
            return match videos.iter().find(|d| &d.id == id) {
                Some(device) => Ok(Some(device.id.clone())),
                None => Err(MediaError::DeviceUnavailable {
                    reason: format!("no camera with id {}", id),
                }),
            };
        }

        if let Some(facing) = constraints.facing_mode {
            if facing.is_exact() && facing.mode() == FacingMode::Environment {
                return match videos.iter().find(|d| d.looks_rear_facing()) {
                    Some(device) => Ok(Some(device.id.clone())),
                    None => Err(MediaError::DeviceUnavailable {
                        reason: "OverconstrainedError: facingMode".to_string(),
                    }),
                };
            }
        }

        match videos.first() {
            Some(device) => Ok(Some(device.id.clone())),
            None => Err(MediaError::DeviceUnavailable {
                reason: "NotFoundError: Requested device not found".to_string(),
            }),
        }
    }
}

#[async_trait]
impl MediaDevices for MockMediaDevices {
    async fn enumerate_devices(&self) -> MediaResult<Vec<CameraDevice>> {
        if let Some(error) = self.enumeration_failure.lock().clone() {
            return Err(error);
        }
        Ok(self.devices.lock().clone())
    }

    async fn get_user_media(&self, constraints: &StreamConstraints) -> MediaResult<StreamHandle> {
        self.requests.lock().push(constraints.clone());

        {
            let mut failures = self.acquire_failures.lock();
            if !failures.is_empty() {
                return Err(failures.remove(0));
            }
        }

        let device_id = self.pick_device(constraints)?;
        let serial = self.tracks.lock().len();

        let mut created = vec![Arc::new(MockTrack::new(
            format!("video-{}", serial),
            TrackKind::Video,
        ))];
        if self.audio_tracks.load(Ordering::SeqCst) {
            created.push(Arc::new(MockTrack::new(
                format!("audio-{}", serial),
                TrackKind::Audio,
            )));
        }
        self.tracks.lock().extend(created.iter().cloned());

        let tracks: Vec<Arc<dyn MediaTrack>> = created
            .into_iter()
            .map(|t| t as Arc<dyn MediaTrack>)
            .collect();
        debug!("Mock camera opened {:?} with {} track(s)", device_id, tracks.len());
        Ok(StreamHandle::new(device_id, tracks))
    }
}

/// Decoder whose detections are pushed by the test via [`emit`](Self::emit)
pub struct MockBarcodeDecoder {
    hub: DetectionHub,
    running: AtomicBool,
    init_failure: Mutex<Option<String>>,
    init_calls: AtomicUsize,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    last_config: Mutex<Option<DecoderConfig>>,
    target: Mutex<Option<Arc<dyn DisplaySurface>>>,
}

impl MockBarcodeDecoder {
    pub fn new() -> Self {
        Self {
            hub: DetectionHub::default(),
            running: AtomicBool::new(false),
            init_failure: Mutex::new(None),
            init_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            last_config: Mutex::new(None),
            target: Mutex::new(None),
        }
    }

    /// Make the next `init` fail with `reason`
    pub fn fail_init(&self, reason: impl Into<String>) {
        *self.init_failure.lock() = Some(reason.into());
    }

    /// Report a detection while running; returns subscribers reached
    pub fn emit(&self, value: &str) -> usize {
        if !self.is_running() {
            debug!("Mock decoder not running, dropping {}", value);
            return 0;
        }
        self.hub.publish(ScannedCode::new(value))
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        self.hub.subscriber_count()
    }

    pub fn last_config(&self) -> Option<DecoderConfig> {
        self.last_config.lock().clone()
    }

    /// Stream id bound to the surface the decoder was initialised on
    pub fn target_source_id(&self) -> Option<String> {
        self.target.lock().as_ref().and_then(|t| t.source_id())
    }

    /// Frames a pixel-reading decoder would see on its target surface
    pub fn target_frames(&self) -> Option<FrameReceiver> {
        self.target.lock().as_ref().and_then(|t| t.frames())
    }
}

impl Default for MockBarcodeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BarcodeDecoder for MockBarcodeDecoder {
    async fn init(&self, config: &DecoderConfig, target: Arc<dyn DisplaySurface>) -> MediaResult<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.init_failure.lock().take() {
            return Err(MediaError::DecoderInit { reason });
        }
        config.validate().map_err(|e| MediaError::DecoderInit {
            reason: e.to_string(),
        })?;
        *self.last_config.lock() = Some(config.clone());
        *self.target.lock() = Some(target);
        Ok(())
    }

    fn start(&self) {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.running.store(true, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn subscribe(&self) -> DetectionSubscription {
        self.hub.subscribe()
    }
}
