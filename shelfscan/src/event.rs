//! Event system for scan session lifecycle

use tokio::sync::broadcast;
use tracing::debug;

/// Events emitted by the scanner during a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A scan was requested
    ScanStarted,
    /// The camera granted a stream
    StreamAcquired {
        /// Stream id
        stream_id: String,
        /// Device the stream was opened on, if known
        device_id: Option<String>,
    },
    /// The decoder is running against the stream
    DecoderStarted,
    /// The decoder reported a code
    CodeDetected {
        /// Decoded value
        code: String,
    },
    /// A catalog lookup finished
    LookupCompleted {
        /// Looked-up code
        isbn: String,
        /// Whether the catalog had the book
        found: bool,
    },
    /// The stream was released and the decoder stopped
    ScanStopped {
        /// Number of hardware tracks stopped
        tracks_stopped: usize,
    },
    /// A scan attempt was aborted
    ScanFailed {
        /// Error that occurred
        error: String,
    },
}

impl ScanEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            ScanEvent::ScanStarted => "scan_started",
            ScanEvent::StreamAcquired { .. } => "stream_acquired",
            ScanEvent::DecoderStarted => "decoder_started",
            ScanEvent::CodeDetected { .. } => "code_detected",
            ScanEvent::LookupCompleted { .. } => "lookup_completed",
            ScanEvent::ScanStopped { .. } => "scan_stopped",
            ScanEvent::ScanFailed { .. } => "scan_failed",
        }
    }

    /// Check if this is an error event
    pub fn is_error_event(&self) -> bool {
        matches!(self, ScanEvent::ScanFailed { .. })
    }
}

/// Stream of scanner events for async iteration
#[derive(Debug)]
pub struct EventStream {
    receiver: broadcast::Receiver<ScanEvent>,
}

impl EventStream {
    pub(crate) fn new(receiver: broadcast::Receiver<ScanEvent>) -> Self {
        Self { receiver }
    }

    /// Get the next event; `None` once the scanner is gone
    pub async fn next(&mut self) -> Option<ScanEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("📡 Event stream lagged, {} event(s) skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to get the next event without waiting
    pub fn try_next(&mut self) -> Option<ScanEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Drain every event currently queued
    pub fn drain(&mut self) -> Vec<ScanEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}
