pub mod artifact;
pub mod capture;
pub mod config;
pub mod encoder;
pub mod error;
pub mod export;
pub mod recorder;
pub mod timer;

pub use artifact::{ArtifactBuffer, BufferPolicy, RecordingArtifact};
pub use capture::{
    CaptureBackend, CaptureConstraints, CaptureSession, CaptureSource, PlatformError,
    PromptResponse, SyntheticCamera,
};
pub use config::RecorderConfig;
pub use encoder::{
    EncodedChunk, EncoderFactory, EncoderOptions, EncoderState, MediaEncoder,
    SyntheticEncoderFactory,
};
pub use error::{CaptureError, RecorderError, PERMISSION_DENIED_MESSAGE};
pub use export::{DirectorySaveTarget, ExportGateway, ExportHandle, ExportReceipt, SaveTarget};
pub use recorder::{Controls, RecorderStatus, RecordingState, VideoRecorder};
pub use timer::{ElapsedTimer, TimerState};
