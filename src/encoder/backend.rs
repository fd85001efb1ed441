use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::capture::CaptureSession;

/// Container/codec declaration used for recordings
pub const WEBM_VP9_OPUS: &str = "video/webm;codecs=vp9,opus";

/// Media type stamped on finished recordings
pub const WEBM_MEDIA_TYPE: &str = "video/webm";

/// Options handed to the encoder when it is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderOptions {
    /// Full MIME declaration, e.g. `video/webm;codecs=vp9,opus`
    pub mime_type: String,
}

impl EncoderOptions {
    /// Container subtype (`webm` for `video/webm;codecs=...`)
    pub fn container(&self) -> Option<&str> {
        self.mime_type
            .split(';')
            .next()
            .and_then(|essence| essence.split('/').nth(1))
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Codecs listed in the `codecs=` parameter, in declaration order
    pub fn codecs(&self) -> Vec<&str> {
        self.mime_type
            .split(';')
            .skip(1)
            .filter_map(|param| param.trim().strip_prefix("codecs="))
            .flat_map(|list| list.trim_matches('"').split(','))
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect()
    }
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            mime_type: WEBM_VP9_OPUS.to_string(),
        }
    }
}

/// One unit of encoded media emitted while recording
#[derive(Debug, Clone)]
pub struct EncodedChunk {
    /// Encoded container bytes
    pub data: Vec<u8>,
    /// Milliseconds of active recording covered when the chunk was emitted
    pub timestamp_ms: u64,
}

/// Lifecycle of a platform encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderState {
    Inactive,
    Recording,
    Paused,
}

/// Sending half of the chunk channel given to an encoder
pub type ChunkSender = mpsc::UnboundedSender<EncodedChunk>;

/// Receiving half kept by the recorder
pub type ChunkReceiver = mpsc::UnboundedReceiver<EncodedChunk>;

/// Platform encoder bound to one capture session
///
/// Chunks are delivered through the `ChunkSender` passed at open time. The
/// encoder must drop its sender once the final chunk after `stop` has been
/// sent, so the receiver can observe the end of the recording.
pub trait MediaEncoder: Send {
    fn start(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn resume(&mut self) -> Result<()>;

    /// Stop encoding and flush the final chunk
    ///
    /// Stopping an inactive encoder is a no-op.
    fn stop(&mut self) -> Result<()>;

    fn state(&self) -> EncoderState;

    /// Get encoder name for logging
    fn name(&self) -> &str;
}

/// Opens encoders bound to a capture session
pub trait EncoderFactory: Send + Sync {
    fn open(
        &self,
        session: &CaptureSession,
        options: &EncoderOptions,
        chunks: ChunkSender,
    ) -> Result<Box<dyn MediaEncoder>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_declare_webm_vp9_opus() {
        let options = EncoderOptions::default();

        assert_eq!(options.container(), Some("webm"));
        assert_eq!(options.codecs(), vec!["vp9", "opus"]);
    }

    #[test]
    fn test_quoted_codecs_parameter() {
        let options = EncoderOptions {
            mime_type: "video/webm; codecs=\"vp8, vorbis\"".to_string(),
        };

        assert_eq!(options.container(), Some("webm"));
        assert_eq!(options.codecs(), vec!["vp8", "vorbis"]);
    }

    #[test]
    fn test_bare_media_type_has_no_codecs() {
        let options = EncoderOptions {
            mime_type: "video/mp4".to_string(),
        };

        assert_eq!(options.container(), Some("mp4"));
        assert!(options.codecs().is_empty());
    }
}
