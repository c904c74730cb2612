//! Encode requests and their validation
//!
//! A [`RawRequest`] holds settings as the user typed them. [`RawRequest::validate`]
//! turns it into an [`EncodeRequest`] or the first problem found. Validation
//! never touches the filesystem beyond reading the encoder path's metadata.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{Container, Crf, FrameRate, ImageFormat, SpeedPreset, VideoCodec};
use crate::error::{PlayblastError, Result};

/// User settings before validation
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub encoder_path: PathBuf,
    pub start_frame: String,
    pub end_frame: String,
    pub fps: FrameRate,
    pub codec: VideoCodec,
    pub preset: SpeedPreset,
    pub crf: i64,
    pub container: Container,
    pub output_path: String,
    pub include_ornaments: bool,
    pub cleanup: bool,
    pub image_format: ImageFormat,
}

/// A validated encode request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeRequest {
    pub encoder_path: PathBuf,
    pub start_frame: i64,
    pub end_frame: i64,
    pub fps: FrameRate,
    pub codec: VideoCodec,
    pub preset: SpeedPreset,
    pub crf: Crf,
    pub container: Container,
    pub output_path: PathBuf,
    pub include_ornaments: bool,
    pub cleanup: bool,
    pub image_format: ImageFormat,
}

impl RawRequest {
    /// Validate and normalize into an [`EncodeRequest`]
    pub fn validate(&self) -> Result<EncodeRequest> {
        if !is_executable_file(&self.encoder_path) {
            return Err(PlayblastError::EncoderPathInvalid(self.encoder_path.clone()));
        }

        let start_frame = parse_frame(&self.start_frame, "start")?;
        let end_frame = parse_frame(&self.end_frame, "end")?;
        if start_frame > end_frame {
            return Err(PlayblastError::frame_range(format!(
                "Start Frame ({}) must be smaller than End Frame ({})",
                start_frame, end_frame
            )));
        }

        let output = self.output_path.trim();
        if output.is_empty() {
            return Err(PlayblastError::OutputPathMissing);
        }

        let crf = Crf::new(self.crf)?;

        if !self.codec.supports(self.container) {
            return Err(PlayblastError::ContainerUnsupported {
                codec: self.codec,
                container: self.container,
            });
        }

        let output_path = match_extension(Path::new(output), self.container);
        if output_path.as_os_str() != output {
            info!(
                "Output extension does not match container, using {:?}",
                output_path
            );
        }

        Ok(EncodeRequest {
            encoder_path: self.encoder_path.clone(),
            start_frame,
            end_frame,
            fps: self.fps,
            codec: self.codec,
            preset: self.preset,
            crf,
            container: self.container,
            output_path,
            include_ornaments: self.include_ornaments,
            cleanup: self.cleanup,
            image_format: self.image_format,
        })
    }
}

impl EncodeRequest {
    /// Zero-padding width for frame numbers in file names
    pub fn frame_padding(&self) -> usize {
        frame_padding(self.end_frame)
    }

    /// Number of frames in the inclusive range
    pub fn frame_count(&self) -> u64 {
        self.end_frame.abs_diff(self.start_frame) + 1
    }

    /// File stem used for captured frames, taken from the output name
    pub fn frame_stem(&self) -> String {
        self.output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "playblast".to_string())
    }
}

/// Decimal digit count of `end_frame`, ignoring sign
pub fn frame_padding(end_frame: i64) -> usize {
    end_frame.unsigned_abs().to_string().len()
}

/// Replace the extension of `path` so it matches `container`
pub fn match_extension(path: &Path, container: Container) -> PathBuf {
    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == container.extension());
    if matches {
        path.to_path_buf()
    } else {
        path.with_extension(container.extension())
    }
}

fn parse_frame(value: &str, which: &str) -> Result<i64> {
    value.trim().parse::<i64>().map_err(|_| {
        PlayblastError::frame_range(format!("{} frame '{}' is not an integer", which, value))
    })
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
