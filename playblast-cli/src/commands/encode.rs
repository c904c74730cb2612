//! Encode command - capture a frame range and encode it

use anyhow::{Context, Result};
use clap::Args;
use playblast_core::{
    cancel_pair,
    config::{ConfigFile, Container, FrameRate, ImageFormat, SpeedPreset, VideoCodec},
    EncodeEvent, Pipeline, RawRequest, SequenceImport,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;

/// Arguments for the encode command
#[derive(Args)]
pub struct EncodeArgs {
    /// Path to the ffmpeg executable
    #[arg(long)]
    encoder: Option<PathBuf>,

    /// First frame (inclusive)
    #[arg(short, long, allow_hyphen_values = true)]
    start: String,

    /// Last frame (inclusive)
    #[arg(short, long, allow_hyphen_values = true)]
    end: String,

    /// Output frame rate (24, 25, 30, 48, 60, 120)
    #[arg(short, long)]
    fps: Option<FrameRate>,

    /// Video codec (libx264, libx265)
    #[arg(short, long)]
    codec: Option<VideoCodec>,

    /// Encoder speed preset (ultrafast ... veryslow)
    #[arg(short, long)]
    preset: Option<SpeedPreset>,

    /// Constant rate factor, 16-28
    #[arg(long, allow_hyphen_values = true)]
    crf: Option<i64>,

    /// Output container; defaults to the codec's first container
    #[arg(long)]
    container: Option<Container>,

    /// Output video file; the extension is corrected to the container
    #[arg(short, long)]
    output: Option<String>,

    /// Directory holding the rendered `<stem>.<frame>.<ext>` sequence
    #[arg(long)]
    frames_dir: PathBuf,

    /// Only use source frames with this stem
    #[arg(long)]
    stem: Option<String>,

    /// Image format of the source frames (png, jpg, tif)
    #[arg(long)]
    image_format: Option<ImageFormat>,

    /// Include HUD/ornaments in captured frames
    #[arg(long, overrides_with = "no_ornaments")]
    ornaments: bool,

    /// Leave HUD/ornaments out, even if the config file enables them
    #[arg(long, overrides_with = "ornaments")]
    no_ornaments: bool,

    /// Keep the captured frames and manifest after encoding
    #[arg(long, overrides_with = "cleanup")]
    keep_temp: bool,

    /// Delete the captured frames, even if the config file keeps them
    #[arg(long, overrides_with = "keep_temp")]
    cleanup: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Use this config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

impl EncodeArgs {
    /// Merge flags over config file defaults
    fn to_raw_request(&self, config: &ConfigFile) -> RawRequest {
        let defaults = &config.defaults;
        let codec = self.codec.unwrap_or(defaults.codec);
        let container = match self.container {
            Some(container) => container,
            None if codec.supports(defaults.container) => defaults.container,
            None => codec.default_container(),
        };

        RawRequest {
            encoder_path: self
                .encoder
                .clone()
                .unwrap_or_else(|| config.encoder.path.clone()),
            start_frame: self.start.clone(),
            end_frame: self.end.clone(),
            fps: self.fps.unwrap_or(defaults.fps),
            codec,
            preset: self.preset.unwrap_or(defaults.preset),
            crf: self.crf.unwrap_or(i64::from(defaults.crf.value())),
            container,
            output_path: self.output.clone().unwrap_or_default(),
            include_ornaments: switch(self.ornaments, self.no_ornaments, defaults.ornaments),
            cleanup: switch(self.cleanup, self.keep_temp, defaults.cleanup),
            image_format: self.image_format.unwrap_or(defaults.image_format),
        }
    }
}

/// Resolve an on/off flag pair, falling back to the config value
fn switch(on: bool, off: bool, default: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}

/// Run one capture-and-encode cycle
pub async fn encode(args: EncodeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ConfigFile::load_from(path.clone()),
        None => ConfigFile::load(),
    }
    .context("Failed to load configuration")?;

    let raw = args.to_raw_request(&config);
    let request = raw.validate()?;

    if !args.json {
        println!("Playblast - Encoding\n");
        println!("Configuration:");
        println!("  Frames:     {}-{} ({} frames)", request.start_frame, request.end_frame, request.frame_count());
        println!("  Source:     {}", args.frames_dir.display());
        println!("  Framerate:  {} fps", request.fps);
        println!("  Codec:      {}", request.codec);
        println!("  Preset:     {}", request.preset);
        println!("  CRF:        {}", request.crf.value());
        println!("  Output:     {}", request.output_path.display());
        println!();
        println!("Press Ctrl+C to cancel...\n");
    }

    let mut capturer = SequenceImport::new(&args.frames_dir);
    if let Some(stem) = &args.stem {
        capturer = capturer.with_stem(stem.clone());
    }

    let (events_tx, events_rx) = mpsc::channel(256);
    let pipeline = Pipeline::new(Arc::new(capturer)).with_events(events_tx);
    let printer = tokio::spawn(print_progress(events_rx, !args.json));

    let (cancel, token) = cancel_pair();
    let result = {
        let run = pipeline.run(request, token);
        tokio::pin!(run);

        tokio::select! {
            result = &mut run => result,
            _ = signal::ctrl_c() => {
                eprintln!("\nReceived interrupt signal, stopping encoder...");
                cancel.cancel();
                run.await
            }
        }
    };

    // Closes the event channel so the printer finishes
    drop(pipeline);
    printer.await?;

    let report = result?;
    info!("Encode finished in {:.1}s", report.elapsed_seconds);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    report.into_result()?;
    Ok(())
}

/// Show a single updating progress line on stderr
async fn print_progress(mut events: mpsc::Receiver<EncodeEvent>, show: bool) {
    let mut shown = false;
    while let Some(event) = events.recv().await {
        if let EncodeEvent::Progress { frame, total } = event {
            if show {
                eprint!("\rEncoding frame {}/{}", frame, total);
                let _ = std::io::stderr().flush();
                shown = true;
            }
        }
    }
    if shown {
        eprintln!();
    }
}
