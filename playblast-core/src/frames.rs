//! Captured frame sequences
//!
//! Frame paths are derived from the frame range, never from a directory
//! listing, so the order always matches capture order.

use std::path::PathBuf;

use crate::config::ImageFormat;
use crate::error::{PlayblastError, Result};

/// An image sequence `<dir>/<stem>.<frame>.<ext>` over an inclusive range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    dir: PathBuf,
    stem: String,
    start: i64,
    end: i64,
    padding: usize,
    format: ImageFormat,
}

impl FrameSequence {
    pub fn new(
        dir: impl Into<PathBuf>,
        stem: impl Into<String>,
        start: i64,
        end: i64,
        padding: usize,
        format: ImageFormat,
    ) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
            start,
            end,
            padding,
            format,
        }
    }

    /// Number of frames in the sequence
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end.abs_diff(self.start) + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// File name for a single frame, e.g. `shot.0042.png`
    pub fn file_name(&self, frame: i64) -> String {
        format!(
            "{}.{:0width$}.{}",
            self.stem,
            frame,
            self.format.extension(),
            width = self.padding
        )
    }

    /// Full path for a single frame
    pub fn frame_path(&self, frame: i64) -> PathBuf {
        self.dir.join(self.file_name(frame))
    }

    /// Frame numbers in capture order
    pub fn frames(&self) -> impl Iterator<Item = i64> + '_ {
        self.start..=self.end
    }

    /// File names in capture order
    pub fn file_names(&self) -> impl Iterator<Item = String> + '_ {
        self.frames().map(|f| self.file_name(f))
    }

    /// Fail if any expected frame is absent on disk
    pub fn verify_present(&self) -> Result<()> {
        let mut missing = self
            .frames()
            .map(|f| self.frame_path(f))
            .filter(|p| !p.is_file());

        match missing.next() {
            None => Ok(()),
            Some(first) => Err(PlayblastError::FramesMissing {
                missing: 1 + missing.count(),
                first,
            }),
        }
    }
}
