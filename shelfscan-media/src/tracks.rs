//! Track abstractions and media frame types

use std::fmt;
use tokio::sync::watch;

/// Receiver side of a track's latest-frame channel
pub type FrameReceiver = watch::Receiver<Option<VideoFrame>>;

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TrackKind {
    /// Video track
    Video,
    /// Audio track
    Audio,
}

/// One hardware-backed sub-stream of a captured device stream.
///
/// Dropping a track does not necessarily release the hardware; the capture
/// indicator only goes off once [`MediaTrack::stop`] has been called on every
/// track of a stream.
pub trait MediaTrack: Send + Sync + fmt::Debug {
    /// Track ID
    fn id(&self) -> &str;

    /// Track kind
    fn kind(&self) -> TrackKind;

    /// Stop the track and release its hardware. Must be idempotent.
    fn stop(&self);

    /// Whether the track is still producing media
    fn is_live(&self) -> bool;

    /// Latest-frame channel, for video tracks that expose raw frames
    fn frames(&self) -> Option<FrameReceiver> {
        None
    }
}

/// Video frame representation
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Raw RGB frame data
    pub data: Vec<u8>,
    /// Timestamp in milliseconds
    pub timestamp: u64,
}

impl VideoFrame {
    /// Expected byte length of an RGB24 frame of this size
    pub fn expected_rgb_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Whether `data` holds exactly one RGB24 frame
    pub fn is_complete(&self) -> bool {
        self.data.len() == self.expected_rgb_len()
    }
}
