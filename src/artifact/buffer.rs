use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::encoder::EncodedChunk;

/// How chunks of one recording session are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferPolicy {
    /// Concatenate every chunk of the session in arrival order
    #[default]
    Accumulate,
    /// Keep only the most recent chunk
    LastChunkOnly,
}

/// Finished recording: immutable bytes plus their media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingArtifact {
    data: Arc<[u8]>,
    media_type: String,
}

impl RecordingArtifact {
    pub fn new(data: impl Into<Arc<[u8]>>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// New reference to the same bytes
    pub fn share(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }
}

/// Collects encoded chunks of the current recording into one artifact
///
/// Only the most recent recording is retained. The previous artifact stays
/// available until the first chunk of a new session supersedes it, but it is
/// no longer downloadable once that session has begun.
pub struct ArtifactBuffer {
    policy: BufferPolicy,
    media_type: String,
    chunks: Vec<Vec<u8>>,
    artifact: Option<RecordingArtifact>,
    downloadable: bool,
}

impl ArtifactBuffer {
    pub fn new(policy: BufferPolicy, media_type: impl Into<String>) -> Self {
        Self {
            policy,
            media_type: media_type.into(),
            chunks: Vec::new(),
            artifact: None,
            downloadable: false,
        }
    }

    pub fn policy(&self) -> BufferPolicy {
        self.policy
    }

    /// Reset for a new recording session
    ///
    /// Pending chunks of the previous session are folded into its artifact
    /// first, so it survives until the new session's first chunk.
    pub fn begin_session(&mut self) {
        if self.artifact.is_none() && !self.chunks.is_empty() {
            let data: Vec<u8> = self.chunks.concat();
            self.artifact = Some(RecordingArtifact::new(data, self.media_type.clone()));
        }

        debug!(
            "Artifact buffer: new session ({} previous chunks retired)",
            self.chunks.len()
        );
        self.chunks.clear();
        self.downloadable = false;
    }

    /// Withdraw the current artifact from download without discarding it
    pub fn mark_stale(&mut self) {
        self.downloadable = false;
    }

    /// Apply one chunk event; returns whether the chunk was kept
    pub fn on_chunk(&mut self, chunk: EncodedChunk) -> bool {
        if chunk.data.is_empty() {
            debug!("Ignoring empty chunk at {}ms", chunk.timestamp_ms);
            return false;
        }

        if self.policy == BufferPolicy::LastChunkOnly {
            self.chunks.clear();
        }

        debug!(
            "Chunk received: {} bytes at {}ms",
            chunk.data.len(),
            chunk.timestamp_ms
        );
        self.chunks.push(chunk.data);
        self.artifact = None;

        if !self.downloadable {
            info!("Recording data available for download");
        }
        self.downloadable = true;
        true
    }

    pub fn is_downloadable(&self) -> bool {
        self.downloadable
    }

    /// Number of chunks held for the current session
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Current artifact, or `None` if no chunk ever arrived
    pub fn finalize(&mut self) -> Option<RecordingArtifact> {
        if self.artifact.is_none() && !self.chunks.is_empty() {
            let data: Vec<u8> = self.chunks.concat();
            self.artifact = Some(RecordingArtifact::new(data, self.media_type.clone()));
        }

        self.artifact.clone()
    }
}
