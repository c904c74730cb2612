//! Frame capture collaborators
//!
//! The host application's viewport capture sits behind [`FrameCapturer`].
//! [`SequenceImport`] stands in for it by pulling an already rendered image
//! sequence off disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ImageFormat;
use crate::error::{PlayblastError, Result};
use crate::frames::FrameSequence;

/// Everything a capturer needs to produce one image per frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureJob {
    pub start_frame: i64,
    pub end_frame: i64,
    pub padding: usize,
    pub include_ornaments: bool,
    pub image_format: ImageFormat,
    /// Directory the images go into
    pub output_dir: PathBuf,
    /// File stem; images are `<output_dir>/<stem>.<frame>.<ext>`
    pub stem: String,
}

impl CaptureJob {
    /// The sequence this job is expected to produce
    pub fn sequence(&self) -> FrameSequence {
        FrameSequence::new(
            &self.output_dir,
            &self.stem,
            self.start_frame,
            self.end_frame,
            self.padding,
            self.image_format,
        )
    }

    /// `<output_dir>/<stem>`, the prefix hosts usually ask for
    pub fn output_prefix(&self) -> PathBuf {
        self.output_dir.join(&self.stem)
    }
}

/// Produces still images for a frame range
///
/// Implementations must have written every frame before returning.
pub trait FrameCapturer: Send + Sync {
    fn capture(&self, job: &CaptureJob) -> Result<()>;
}

/// Copies an existing `<stem>.<frame>.<ext>` sequence into the scratch layout
///
/// Source frames may use any zero padding.
#[derive(Debug, Clone)]
pub struct SequenceImport {
    source_dir: PathBuf,
    source_stem: Option<String>,
}

impl SequenceImport {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            source_stem: None,
        }
    }

    /// Only match source files with this stem
    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.source_stem = Some(stem.into());
        self
    }

    /// Index source frames in the range by frame number
    fn index(&self, job: &CaptureJob) -> Result<HashMap<i64, PathBuf>> {
        let entries = std::fs::read_dir(&self.source_dir).map_err(|e| {
            PlayblastError::capture(format!(
                "Cannot read source directory {:?}: {}",
                self.source_dir, e
            ))
        })?;

        let range = job.start_frame..=job.end_frame;
        let mut frames = HashMap::new();
        for entry in entries {
            let path = entry?.path();
            let Some((stem, frame)) = parse_frame_name(&path, job.image_format) else {
                continue;
            };
            if self.source_stem.as_deref().is_some_and(|s| s != stem) {
                continue;
            }
            if !range.contains(&frame) {
                continue;
            }
            if let Some(previous) = frames.insert(frame, path.clone()) {
                return Err(PlayblastError::capture(format!(
                    "Frame {} found twice: {:?} and {:?} (use a stem to disambiguate)",
                    frame, previous, path
                )));
            }
        }
        Ok(frames)
    }
}

impl FrameCapturer for SequenceImport {
    fn capture(&self, job: &CaptureJob) -> Result<()> {
        if job.include_ornaments {
            debug!("Ornaments are baked into imported frames; flag ignored");
        }

        let sources = self.index(job)?;
        let target = job.sequence();

        for frame in target.frames() {
            let source = sources.get(&frame).ok_or_else(|| {
                PlayblastError::capture(format!(
                    "Frame {} not found in {:?}",
                    frame, self.source_dir
                ))
            })?;
            std::fs::copy(source, target.frame_path(frame))?;
        }

        info!(
            "Imported {} frame(s) from {:?} as {:?}",
            target.len(),
            self.source_dir,
            job.output_prefix()
        );
        Ok(())
    }
}

/// Split `shot.0042.png` into (`shot`, 42) when the extension matches
fn parse_frame_name(path: &Path, format: ImageFormat) -> Option<(String, i64)> {
    let ext = path.extension()?.to_str()?;
    if !ext.eq_ignore_ascii_case(format.extension()) {
        return None;
    }
    let name = path.file_stem()?.to_str()?;
    let (stem, number) = name.rsplit_once('.')?;
    if number.is_empty() || !number.trim_start_matches('-').bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((stem.to_string(), number.parse().ok()?))
}
