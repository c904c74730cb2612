//! Error types for Playblast

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{Container, VideoCodec};

/// Result type alias using PlayblastError
pub type Result<T> = std::result::Result<T, PlayblastError>;

/// Main error type for Playblast operations
#[derive(Debug, Error)]
pub enum PlayblastError {
    /// Encoder binary missing or not executable
    #[error("Encoder not found at: '{}'", .0.display())]
    EncoderPathInvalid(PathBuf),

    /// Start/end frame unparseable or out of order
    #[error("Invalid frame range: {0}")]
    FrameRangeInvalid(String),

    /// No output file path given
    #[error("Please choose an output filepath")]
    OutputPathMissing,

    /// CRF outside the accepted quality range
    #[error("CRF {0} is outside the supported range {min}-{max}", min = crate::config::Crf::MIN, max = crate::config::Crf::MAX)]
    CrfOutOfRange(i64),

    /// Container not available for the selected codec
    #[error("Container '{container}' is not supported by {codec}")]
    ContainerUnsupported {
        codec: VideoCodec,
        container: Container,
    },

    /// Unknown value for an enumerated option
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Capture finished but some expected frames are absent
    #[error("{missing} captured frame(s) missing, first: '{}'", .first.display())]
    FramesMissing { missing: usize, first: PathBuf },

    /// Frame capture failed
    #[error("Capture error: {0}")]
    Capture(String),

    /// Encoder ran but produced no usable output
    #[error("Encode failed: {0}")]
    EncodeProcessFailure(String),

    /// Encode cancelled before completion
    #[error("Encode cancelled")]
    Cancelled,

    /// Another request is already running on this pipeline
    #[error("An encode is already in progress")]
    EncodeInProgress,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PlayblastError>,
    },
}

impl PlayblastError {
    /// Create a frame range error
    pub fn frame_range(msg: impl Into<String>) -> Self {
        Self::FrameRangeInvalid(msg.into())
    }

    /// Create an invalid option error
    pub fn invalid_option(msg: impl Into<String>) -> Self {
        Self::InvalidOption(msg.into())
    }

    /// Create a capture error
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Create an encode failure
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeProcessFailure(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping context wrappers
    pub fn root(&self) -> &PlayblastError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// A short suggestion for the user on how to fix the problem
    pub fn user_hint(&self) -> Option<&'static str> {
        match self.root() {
            Self::EncoderPathInvalid(_) => Some(
                "Point --encoder (or [encoder] path in config.toml) at an ffmpeg executable",
            ),
            Self::FrameRangeInvalid(_) => {
                Some("Start and end frames must be integers with start <= end")
            }
            Self::OutputPathMissing => Some("Pass an output file with --output"),
            Self::CrfOutOfRange(_) => Some("Use a CRF between 16 (best) and 28 (smallest)"),
            Self::ContainerUnsupported { .. } => {
                Some("Run 'playblast list' to see the containers each codec supports")
            }
            Self::InvalidOption(_) => Some("Run 'playblast list' to see the accepted values"),
            Self::FramesMissing { .. } | Self::Capture(_) => {
                Some("Check that the source sequence covers the whole frame range")
            }
            Self::EncodeProcessFailure(_) => {
                Some("See the encoder output above for the underlying FFmpeg error")
            }
            Self::EncodeInProgress => Some("Wait for the running encode to finish"),
            Self::Config(_) => Some("Check your config.toml, or regenerate it with 'playblast config init --force'"),
            Self::Cancelled | Self::Io(_) | Self::WithContext { .. } => None,
        }
    }

    /// Whether the user can fix this by changing their input
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self.root(),
            Self::EncoderPathInvalid(_)
                | Self::FrameRangeInvalid(_)
                | Self::OutputPathMissing
                | Self::CrfOutOfRange(_)
                | Self::ContainerUnsupported { .. }
                | Self::InvalidOption(_)
                | Self::FramesMissing { .. }
                | Self::EncodeInProgress
                | Self::Config(_)
        )
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
