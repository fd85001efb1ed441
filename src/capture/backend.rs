use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Audio constraints requested alongside video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConstraints {
    /// Ask the platform to cancel speaker echo on the microphone track
    pub echo_cancellation: bool,
}

/// Constraints passed to the platform when requesting a live stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    /// Capture the camera
    pub video: bool,
    /// Capture the microphone
    pub audio: AudioConstraints,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: AudioConstraints {
                echo_cancellation: true,
            },
        }
    }
}

/// Kind of media carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// Descriptor of one track inside a live stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub kind: TrackKind,
    /// Device label reported by the platform
    pub label: String,
}

/// Error raised by the platform when a stream request fails
///
/// `name` carries the platform's error class (e.g. `NotAllowedError`),
/// `message` its human-readable text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name}: {message}")]
pub struct PlatformError {
    pub name: String,
    pub message: String,
}

impl PlatformError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The error a platform reports when the user refuses the prompt
    pub fn permission_denied() -> Self {
        Self::new("NotAllowedError", "Permission denied")
    }

    pub fn is_permission_denied(&self) -> bool {
        self.name == "NotAllowedError" && self.message == "Permission denied"
    }
}

/// A platform stream whose tracks can be stopped
pub trait LiveStream: Send + Sync {
    /// Tracks carried by this stream
    fn tracks(&self) -> Vec<TrackInfo>;

    /// Stop every track, releasing the devices. Must be idempotent.
    fn stop_tracks(&mut self);

    /// Whether any track is still running
    fn is_live(&self) -> bool;
}

/// Live camera + microphone stream owned by the recorder
///
/// Tracks are stopped when the session is explicitly stopped or dropped.
pub struct CaptureSession {
    id: Uuid,
    stream: Box<dyn LiveStream>,
}

impl CaptureSession {
    pub fn new(stream: Box<dyn LiveStream>) -> Self {
        Self {
            id: Uuid::new_v4(),
            stream,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tracks(&self) -> Vec<TrackInfo> {
        self.stream.tracks()
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_live()
    }

    /// Stop all tracks of the underlying stream
    pub fn stop(&mut self) {
        if self.stream.is_live() {
            tracing::debug!("Stopping tracks of capture session {}", self.id);
            self.stream.stop_tracks();
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureSession")
            .field("id", &self.id)
            .field("tracks", &self.stream.tracks())
            .field("live", &self.stream.is_live())
            .finish()
    }
}

/// Platform capture backend trait
///
/// Implementations:
/// - Synthetic: in-process test pattern (demo and tests)
/// - Platform bindings live outside this crate
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Request a live stream matching the constraints
    ///
    /// May suspend indefinitely while the platform shows a permission prompt.
    async fn acquire(&self, constraints: &CaptureConstraints)
        -> Result<CaptureSession, PlatformError>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}
