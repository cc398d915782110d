// ── Transient configuration archive ──
//
// One fixed path holds the exported configuration for the whole run. It is
// written before each target sync and removed after it. Nothing locks it:
// runs must not overlap, and targets are handled one after another.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::CoreError;

/// Default archive location, relative to the working directory.
pub const DEFAULT_ARCHIVE: &str = "config.zip";

/// Handle to the run's configuration archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigArchive {
    path: PathBuf,
}

impl ConfigArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read the archive into memory.
    pub async fn read(&self) -> Result<Vec<u8>, CoreError> {
        fs::read(&self.path).await.map_err(|e| self.io_error(&e))
    }

    /// Write `contents` to the archive path, replacing any previous file.
    pub async fn write(&self, contents: &[u8]) -> Result<(), CoreError> {
        fs::write(&self.path, contents)
            .await
            .map_err(|e| self.io_error(&e))?;
        debug!(path = %self.path.display(), size = contents.len(), "archive written");
        Ok(())
    }

    /// Delete the archive if present.
    ///
    /// Returns whether a file was removed.
    pub async fn remove(&self) -> Result<bool, CoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "archive removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(&e)),
        }
    }

    fn io_error(&self, err: &io::Error) -> CoreError {
        CoreError::Archive {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl Default for ConfigArchive {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE)
    }
}
