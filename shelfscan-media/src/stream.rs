//! Camera stream ownership
//!
//! [`StreamSession`] owns the single live camera stream of a scanner. It is
//! the only place that acquires or releases hardware, so a scanner can never
//! leak a stream with its capture indicator still lit.

use crate::capture::MediaDevices;
use crate::constraints::StreamConstraints;
use crate::error::{MediaError, MediaResult};
use crate::tracks::{FrameReceiver, MediaTrack, TrackKind};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A live media stream: one or more hardware tracks from one device
#[derive(Clone)]
pub struct StreamHandle {
    id: String,
    device_id: Option<String>,
    tracks: Vec<Arc<dyn MediaTrack>>,
}

impl StreamHandle {
    pub fn new(device_id: Option<String>, tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            device_id,
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Device the stream was opened on, when the backend reports one
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn tracks(&self) -> &[Arc<dyn MediaTrack>] {
        &self.tracks
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &Arc<dyn MediaTrack>> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Video)
    }

    /// Frames of the first video track that publishes them
    pub fn video_frames(&self) -> Option<FrameReceiver> {
        self.video_tracks().find_map(|t| t.frames())
    }

    pub fn is_live(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }

    /// Stop every track individually. Returns the number of tracks stopped.
    pub fn stop_all(&self) -> usize {
        for track in &self.tracks {
            debug!("Stopping {:?} track {}", track.kind(), track.id());
            track.stop();
        }
        self.tracks.len()
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("id", &self.id)
            .field("device_id", &self.device_id)
            .field("tracks", &self.tracks.len())
            .finish()
    }
}

/// Something a stream can be shown on, and that the decoder reads frames from
pub trait DisplaySurface: Send + Sync {
    /// Bind or clear the surface's video source
    fn set_source(&self, stream: Option<StreamHandle>);

    /// Id of the stream currently bound, if any
    fn source_id(&self) -> Option<String>;

    /// Frames of the bound stream, for decoders that read raw pixels
    fn frames(&self) -> Option<FrameReceiver>;
}

/// In-process video surface holding the bound stream
#[derive(Debug, Default)]
pub struct VideoSurface {
    source: RwLock<Option<StreamHandle>>,
}

impl VideoSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_source(&self) -> bool {
        self.source.read().is_some()
    }
}

impl DisplaySurface for VideoSurface {
    fn set_source(&self, stream: Option<StreamHandle>) {
        *self.source.write() = stream;
    }

    fn source_id(&self) -> Option<String> {
        self.source.read().as_ref().map(|s| s.id().to_string())
    }

    fn frames(&self) -> Option<FrameReceiver> {
        self.source.read().as_ref().and_then(|s| s.video_frames())
    }
}

/// Lifecycle state of a [`StreamSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No stream held
    Idle,
    /// Waiting for the platform to grant a stream
    Requesting,
    /// A stream is held
    Active,
}

/// Owner of the single active camera stream
pub struct StreamSession {
    backend: Arc<dyn MediaDevices>,
    surface: Option<Arc<dyn DisplaySurface>>,
    active: Option<StreamHandle>,
    state: SessionState,
}

impl StreamSession {
    pub fn new(backend: Arc<dyn MediaDevices>) -> Self {
        Self {
            backend,
            surface: None,
            active: None,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn active(&self) -> Option<&StreamHandle> {
        self.active.as_ref()
    }

    /// Request camera access under `constraints`.
    ///
    /// On failure the session stays `Idle` with nothing recorded.
    pub async fn acquire(&mut self, constraints: &StreamConstraints) -> MediaResult<&StreamHandle> {
        if self.active.is_some() {
            return Err(MediaError::InvalidState {
                message: "a stream is already active; release it first".to_string(),
            });
        }

        self.state = SessionState::Requesting;
        debug!("Requesting camera stream with {:?}", constraints);

        match self.backend.get_user_media(constraints).await {
            Ok(handle) => {
                info!(
                    "📹 Camera stream {} acquired ({} track(s))",
                    handle.id(),
                    handle.tracks().len()
                );
                self.state = SessionState::Active;
                let handle: &StreamHandle = self.active.insert(handle);
                Ok(handle)
            }
            Err(e) => {
                self.state = SessionState::Idle;
                warn!("Camera acquisition failed: {}", e);
                Err(e)
            }
        }
    }

    /// Bind the active stream as the surface's video source
    pub fn attach_to(&mut self, surface: Arc<dyn DisplaySurface>) -> MediaResult<()> {
        let handle = self.active.as_ref().ok_or_else(|| MediaError::InvalidState {
            message: "no active stream to attach".to_string(),
        })?;
        surface.set_source(Some(handle.clone()));
        debug!("Attached stream {} to display surface", handle.id());
        self.surface = Some(surface);
        Ok(())
    }

    /// Stop every track, clear the surface and return to `Idle`.
    ///
    /// Idempotent; returns the number of tracks stopped (0 when there was
    /// nothing to release).
    pub fn release(&mut self) -> usize {
        let stopped = match self.active.take() {
            Some(handle) => {
                let stopped = handle.stop_all();
                info!("⏹️ Released camera stream {} ({} track(s) stopped)", handle.id(), stopped);
                stopped
            }
            None => {
                debug!("No active stream to stop.");
                0
            }
        };

        if let Some(surface) = self.surface.take() {
            surface.set_source(None);
        }
        self.state = SessionState::Idle;
        stopped
    }
}

impl fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSession")
            .field("state", &self.state)
            .field("active", &self.active)
            .finish()
    }
}
