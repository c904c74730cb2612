//! Playblast Core Library
//!
//! Captures a frame range into a scratch directory and encodes it to video
//! with an external FFmpeg binary.
//!
//! This library provides:
//! - Validation of user settings into an [`EncodeRequest`]
//! - A [`FrameCapturer`] seam for the host application's viewport capture
//! - Concat manifest generation and FFmpeg command construction
//! - Cancellable, asynchronous encoder execution with streamed output
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ RawRequest │───▶│ FrameCapturer│───▶│ Concat list  │───▶│ ffmpeg child │
//! │ (validate) │    │ (scratch dir)│    │ (manifest)   │    │ (report)     │
//! └────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```

pub mod capture;
pub mod config;
pub mod encode;
pub mod error;
pub mod frames;
pub mod manifest;
pub mod pipeline;
pub mod request;
pub mod scratch;

pub use capture::{CaptureJob, FrameCapturer, SequenceImport};
pub use config::{Container, Crf, FrameRate, ImageFormat, SpeedPreset, VideoCodec};
pub use encode::{cancel_pair, CancelHandle, CancelToken, EncodeEvent, EncodeOutcome, Termination};
pub use error::{PlayblastError, Result};
pub use pipeline::{EncodeReport, Pipeline, PipelineState};
pub use request::{EncodeRequest, RawRequest};
