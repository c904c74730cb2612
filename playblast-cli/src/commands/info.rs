//! Info command - show encoder information and capabilities

use anyhow::Result;
use clap::Args;
use playblast_core::config::{ConfigFile, VideoCodec};
use playblast_core::encode;
use std::path::PathBuf;

/// Arguments for the info command
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the ffmpeg executable (defaults to the config file value)
    #[arg(short, long)]
    encoder: Option<PathBuf>,
}

/// Show encoder version and which codecs it provides
pub async fn info(args: InfoArgs) -> Result<()> {
    println!("Playblast - Encoder Information\n");

    let config_path = ConfigFile::default_path();
    let config = ConfigFile::load_or_default();
    let encoder = args.encoder.unwrap_or(config.encoder.path);

    println!("Configuration:");
    println!(
        "  File:     {} ({})",
        config_path.display(),
        if config_path.exists() { "found" } else { "not found" }
    );
    println!("  Encoder:  {}", encoder.display());
    println!();

    let probe = encoder.clone();
    let version = tokio::task::spawn_blocking(move || encode::encoder_version(&probe)).await?;

    let Some(version) = version else {
        println!("Encoder could not be run.");
        println!();
        println!("  Make sure that:");
        println!("  - FFmpeg is installed");
        println!("  - The path above points at the ffmpeg executable");
        println!("  - Or pass --encoder, or set [encoder] path in the config file");
        return Ok(());
    };
    println!("Version:");
    println!("  {}", version);
    println!();

    println!("Codec Support:");
    for codec in VideoCodec::ALL {
        let probe = encoder.clone();
        let available =
            tokio::task::spawn_blocking(move || encode::encoder_supports(&probe, codec)).await?;
        let icon = if available { "[OK]" } else { "[!!]" };
        println!("  {} {}", icon, codec);
    }

    Ok(())
}
