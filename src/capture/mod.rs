pub mod backend;
pub mod source;
pub mod synthetic;

pub use backend::{
    AudioConstraints, CaptureBackend, CaptureConstraints, CaptureSession, LiveStream,
    PlatformError, TrackInfo, TrackKind,
};
pub use source::CaptureSource;
pub use synthetic::{PromptResponse, SyntheticCamera};
