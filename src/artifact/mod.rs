mod buffer;

pub use buffer::{ArtifactBuffer, BufferPolicy, RecordingArtifact};
