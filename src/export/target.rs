use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Transient handle to artifact bytes while a save is in flight
///
/// Holds one reference to the shared bytes; dropping it releases that
/// reference.
pub struct ExportHandle {
    data: Arc<[u8]>,
    media_type: String,
}

impl ExportHandle {
    pub fn new(data: Arc<[u8]>, media_type: impl Into<String>) -> Self {
        Self {
            data,
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
}

impl Drop for ExportHandle {
    fn drop(&mut self) {
        debug!("Export handle released ({} bytes)", self.data.len());
    }
}

/// Platform "save as file" mechanism
#[async_trait::async_trait]
pub trait SaveTarget: Send + Sync {
    /// Persist the bytes under `file_name`, returning where they landed
    async fn save(&self, handle: &ExportHandle, file_name: &str) -> Result<PathBuf>;

    /// Get target name for logging
    fn name(&self) -> &str;
}

/// Saves downloads into a directory, like a browser's download folder
///
/// A taken name gets ` (1)`, ` (2)`, ... appended before the extension.
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn free_path(&self, file_name: &str) -> Result<PathBuf> {
        let candidate = self.dir.join(file_name);
        if !tokio::fs::try_exists(&candidate)
            .await
            .context("Failed to check download path")?
        {
            return Ok(candidate);
        }

        let (stem, ext) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (file_name, None),
        };

        let mut n = 1;
        loop {
            let name = match ext {
                Some(ext) => format!("{} ({}).{}", stem, n, ext),
                None => format!("{} ({})", stem, n),
            };
            let candidate = self.dir.join(name);
            if !tokio::fs::try_exists(&candidate)
                .await
                .context("Failed to check download path")?
            {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

#[async_trait::async_trait]
impl SaveTarget for DirectorySaveTarget {
    async fn save(&self, handle: &ExportHandle, file_name: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| {
                format!("Failed to create download directory {}", self.dir.display())
            })?;

        let path = self.free_path(file_name).await?;
        tokio::fs::write(&path, handle.bytes())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(
            "Saved {} ({} bytes, {})",
            path.display(),
            handle.len(),
            handle.media_type()
        );

        Ok(path)
    }

    fn name(&self) -> &str {
        "Directory"
    }
}
