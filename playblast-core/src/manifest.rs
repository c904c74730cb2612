//! FFmpeg concat demuxer input lists

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PlayblastError, Result, ResultExt};
use crate::frames::FrameSequence;

/// Name of the manifest written next to the captured frames
pub const MANIFEST_FILE_NAME: &str = "ffmpeg_input.txt";

/// Ordered list of files for `-f concat`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcatManifest {
    entries: Vec<String>,
}

impl ConcatManifest {
    /// One entry per frame, relative to the sequence directory
    pub fn from_sequence(sequence: &FrameSequence) -> Self {
        Self {
            entries: sequence.file_names().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render in concat syntax, one `file '...'` line per entry
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.entries.len() * 32);
        for entry in &self.entries {
            out.push_str("file '");
            out.push_str(&escape(entry));
            out.push_str("'\n");
        }
        out
    }

    /// Write the manifest into `dir`, returning its path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE_NAME);
        std::fs::write(&path, self.render())
            .map_err(PlayblastError::from)
            .context(format!("Writing concat manifest {:?}", path))?;
        debug!("Wrote {} manifest entries to {:?}", self.entries.len(), path);
        Ok(path)
    }
}

// Quotes end the literal; '\'' closes, emits an escaped quote, reopens.
fn escape(entry: &str) -> String {
    entry.replace('\'', r"'\''")
}
