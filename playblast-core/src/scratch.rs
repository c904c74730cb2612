//! Scratch directories for captured frames
//!
//! A [`ScratchDir`] lives for exactly one capture+encode cycle and removes
//! itself and everything in it when dropped, unless it was kept.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{PlayblastError, Result};

const PREFIX: &str = "playblast-";

/// Uniquely named temporary directory
#[derive(Debug)]
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    /// Create under the system temp directory
    pub fn new() -> Result<Self> {
        Self::wrap(tempfile::Builder::new().prefix(PREFIX).tempdir())
    }

    /// Create under `parent`
    pub fn new_in(parent: impl AsRef<Path>) -> Result<Self> {
        Self::wrap(tempfile::Builder::new().prefix(PREFIX).tempdir_in(parent))
    }

    fn wrap(dir: std::io::Result<TempDir>) -> Result<Self> {
        let dir = dir.map_err(|e| {
            PlayblastError::capture(format!("Failed to create scratch directory: {}", e))
        })?;
        let path = dir.path().to_path_buf();
        debug!("Created scratch directory {:?}", path);
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the directory on disk and return its path
    pub fn keep(mut self) -> PathBuf {
        if let Some(dir) = self.dir.take() {
            let path = dir.keep();
            info!("Keeping captured frames in {:?}", path);
        }
        self.path.clone()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = self.path.clone();
            match dir.close() {
                Ok(()) => debug!("Removed scratch directory {:?}", path),
                Err(e) => warn!("Failed to remove scratch directory {:?}: {}", path, e),
            }
        }
    }
}
