use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use super::target::{ExportHandle, SaveTarget};
use crate::artifact::RecordingArtifact;

/// Outcome of a download
#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    /// Generated file name handed to the platform
    pub file_name: String,
    /// Where the platform stored the file
    pub location: PathBuf,
    pub bytes: usize,
    pub media_type: String,
}

/// Names finished recordings and hands them to the platform save mechanism
pub struct ExportGateway {
    target: Box<dyn SaveTarget>,
    file_prefix: String,
}

impl ExportGateway {
    pub fn new(target: Box<dyn SaveTarget>, file_prefix: impl Into<String>) -> Self {
        Self {
            target,
            file_prefix: file_prefix.into(),
        }
    }

    /// File name for a download made at `now`, e.g.
    /// `recording-2026-10-19_14-03-22.webm`
    pub fn file_name_at(&self, now: &DateTime<Local>, media_type: &str) -> String {
        format!(
            "{}-{}.{}",
            self.file_prefix,
            now.format("%Y-%m-%d_%H-%M-%S"),
            extension_for(media_type)
        )
    }

    /// Save the artifact under a name derived from the current local time
    pub async fn export(&self, artifact: &RecordingArtifact) -> Result<ExportReceipt> {
        self.export_at(artifact, &Local::now()).await
    }

    pub async fn export_at(
        &self,
        artifact: &RecordingArtifact,
        now: &DateTime<Local>,
    ) -> Result<ExportReceipt> {
        let file_name = self.file_name_at(now, artifact.media_type());
        info!(
            "Exporting {} bytes as {} via {}",
            artifact.len(),
            file_name,
            self.target.name()
        );

        let handle = ExportHandle::new(artifact.share(), artifact.media_type());
        let saved = self.target.save(&handle, &file_name).await;
        drop(handle);

        let location = saved.with_context(|| format!("Failed to save {}", file_name))?;

        Ok(ExportReceipt {
            file_name,
            location,
            bytes: artifact.len(),
            media_type: artifact.media_type().to_string(),
        })
    }
}

/// File extension for a media type (`video/webm` → `webm`)
fn extension_for(media_type: &str) -> &str {
    media_type
        .split(';')
        .next()
        .and_then(|essence| essence.split('/').nth(1))
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("bin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::DirectorySaveTarget;
    use chrono::TimeZone;

    #[test]
    fn test_extension_for_media_types() {
        assert_eq!(extension_for("video/webm"), "webm");
        assert_eq!(extension_for("video/webm;codecs=vp9,opus"), "webm");
        assert_eq!(extension_for("video/mp4"), "mp4");
        assert_eq!(extension_for("garbage"), "bin");
    }

    #[test]
    fn test_file_name_from_local_time() {
        let gateway = ExportGateway::new(Box::new(DirectorySaveTarget::new("unused")), "recording");
        let now = Local.with_ymd_and_hms(2026, 10, 19, 14, 3, 22).unwrap();

        assert_eq!(
            gateway.file_name_at(&now, "video/webm"),
            "recording-2026-10-19_14-03-22.webm"
        );
    }
}
