//! Recording state machine
//!
//! This module provides the `VideoRecorder` that drives:
//! - Camera/microphone acquisition and preview
//! - Encoder lifecycle (start, pause, resume, stop)
//! - Chunk delivery into the artifact buffer
//! - The elapsed-time clock, in lockstep with recording state
//! - Download of the latest recording

mod machine;
mod state;

pub use machine::VideoRecorder;
pub use state::{Controls, RecorderStatus, RecordingState};
