//! FFmpeg command line construction

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::{Crf, FrameRate, SpeedPreset, VideoCodec};
use crate::request::EncodeRequest;

/// Pads odd frame sizes up to even, which x264/x265 with yuv420p require
pub const EVEN_PAD_FILTER: &str = "pad=ceil(iw/2)*2:ceil(ih/2)*2";

/// Output pixel format
pub const PIXEL_FORMAT: &str = "yuv420p";

/// Builder for the encoder invocation
#[derive(Debug, Clone)]
pub struct EncoderCommand {
    program: PathBuf,
    manifest: PathBuf,
    output: PathBuf,
    fps: FrameRate,
    codec: VideoCodec,
    crf: Crf,
    preset: SpeedPreset,
}

impl EncoderCommand {
    pub fn new(program: impl Into<PathBuf>, manifest: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            manifest: manifest.into(),
            output: output.into(),
            fps: FrameRate::default(),
            codec: VideoCodec::default(),
            crf: Crf::default(),
            preset: SpeedPreset::default(),
        }
    }

    /// Command for a validated request reading `manifest`
    pub fn for_request(request: &EncodeRequest, manifest: impl Into<PathBuf>) -> Self {
        Self::new(&request.encoder_path, manifest, &request.output_path)
            .with_fps(request.fps)
            .with_codec(request.codec)
            .with_crf(request.crf)
            .with_preset(request.preset)
    }

    pub fn with_fps(mut self, fps: FrameRate) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_codec(mut self, codec: VideoCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_crf(mut self, crf: Crf) -> Self {
        self.crf = crf;
        self
    }

    pub fn with_preset(mut self, preset: SpeedPreset) -> Self {
        self.preset = preset;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Arguments after the program name
    pub fn args(&self) -> Vec<OsString> {
        let fps = self.fps.to_string();
        let crf = self.crf.to_string();
        let mut args: Vec<OsString> = Vec::with_capacity(24);

        args.extend(["-y", "-r", fps.as_str(), "-f", "concat", "-safe", "0", "-i"].map(OsString::from));
        args.push(self.manifest.clone().into_os_string());
        args.extend(
            [
                "-framerate",
                fps.as_str(),
                "-c:v",
                self.codec.ffmpeg_encoder(),
                "-vf",
                EVEN_PAD_FILTER,
                "-crf",
                crf.as_str(),
                "-preset",
                self.preset.as_str(),
                "-pix_fmt",
                PIXEL_FORMAT,
            ]
            .map(OsString::from),
        );
        args.push(self.output.clone().into_os_string());

        args
    }

    /// Build a process ready to spawn
    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(self.args());
        cmd
    }

    /// Human-readable command line for logs
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_os_str().to_os_string())
            .chain(self.args())
            .map(|a| quote(&a.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for EncoderCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

fn quote(arg: &str) -> String {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '*' | '"' | '\'' | '&' | ';' | '|'));
    if needs_quotes {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}
