//! Video encoding via an external FFmpeg binary
//!
//! This module provides:
//! - Command line construction for the concat-demuxer encode
//! - Asynchronous, cancellable execution with streamed diagnostics

mod command;
mod process;

pub use command::{EncoderCommand, EVEN_PAD_FILTER, PIXEL_FORMAT};
pub use process::{
    cancel_pair, parse_progress_frame, run_encoder, CancelHandle, CancelToken, EncodeEvent,
    EncodeOutcome, Termination,
};

use std::path::Path;

/// First line of `<encoder> -version`, if the binary runs
pub fn encoder_version(encoder: &Path) -> Option<String> {
    let output = std::process::Command::new(encoder)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}

/// Check whether the encoder lists `codec` among its encoders
pub fn encoder_supports(encoder: &Path, codec: crate::config::VideoCodec) -> bool {
    let Ok(output) = std::process::Command::new(encoder)
        .args(["-hide_banner", "-encoders"])
        .output()
    else {
        return false;
    };

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .any(|line| line.split_whitespace().nth(1) == Some(codec.ffmpeg_encoder()))
}
