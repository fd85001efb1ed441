use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::artifact::BufferPolicy;
use crate::capture::{AudioConstraints, CaptureConstraints};
use crate::encoder::{EncoderOptions, WEBM_MEDIA_TYPE, WEBM_VP9_OPUS};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    pub capture: CaptureConfig,
    pub encoder: EncoderConfig,
    pub buffer: BufferConfig,
    pub export: ExportConfig,
    /// Show non-permission capture failures to the user instead of only logging them
    pub surface_unclassified_errors: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub video: bool,
    pub echo_cancellation: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub mime_type: String,
    pub artifact_media_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    pub policy: BufferPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            encoder: EncoderConfig::default(),
            buffer: BufferConfig::default(),
            export: ExportConfig::default(),
            surface_unclassified_errors: true,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            video: true,
            echo_cancellation: true,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            mime_type: WEBM_VP9_OPUS.to_string(),
            artifact_media_type: WEBM_MEDIA_TYPE.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("recordings"),
            file_prefix: "recording".to_string(),
        }
    }
}

impl CaptureConfig {
    pub fn constraints(&self) -> CaptureConstraints {
        CaptureConstraints {
            video: self.video,
            audio: AudioConstraints {
                echo_cancellation: self.echo_cancellation,
            },
        }
    }
}

impl EncoderConfig {
    pub fn options(&self) -> EncoderOptions {
        EncoderOptions {
            mime_type: self.mime_type.clone(),
        }
    }
}

impl RecorderConfig {
    /// Load from `path` (any format the `config` crate understands)
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_recording_contract() {
        let cfg = RecorderConfig::default();

        assert_eq!(cfg.capture.constraints(), CaptureConstraints::default());
        assert_eq!(cfg.encoder.options().mime_type, "video/webm;codecs=vp9,opus");
        assert_eq!(cfg.encoder.artifact_media_type, "video/webm");
        assert_eq!(cfg.buffer.policy, BufferPolicy::Accumulate);
        assert!(cfg.surface_unclassified_errors);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent");

        let cfg = RecorderConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.export.file_prefix, "recording");
    }

    #[test]
    fn test_partial_toml_overrides() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("recorder.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "surface_unclassified_errors = false\n\
             [buffer]\npolicy = \"last_chunk_only\"\n\
             [export]\nfile_prefix = \"clip\""
        )
        .unwrap();

        let cfg = RecorderConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.buffer.policy, BufferPolicy::LastChunkOnly);
        assert_eq!(cfg.export.file_prefix, "clip");
        assert_eq!(cfg.export.output_dir, PathBuf::from("recordings"));
        assert!(!cfg.surface_unclassified_errors);
        assert!(cfg.capture.video);
    }
}
