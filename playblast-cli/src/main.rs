//! Playblast CLI
//!
//! Encodes a captured frame range into a video with FFmpeg.
//!
//! # Usage
//!
//! ```bash
//! # Show accepted codecs, containers and presets
//! playblast list
//!
//! # Encode frames 1001-1100 of a rendered sequence
//! playblast encode --frames-dir renders/ --start 1001 --end 1100 -o shot.mp4
//!
//! # Check the encoder
//! playblast info --encoder /usr/bin/ffmpeg
//! ```

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use playblast_core::PlayblastError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Playblast - capture a frame range and encode it with FFmpeg
#[derive(Parser)]
#[command(name = "playblast")]
#[command(author = "GhostKellz")]
#[command(version)]
#[command(about = "Capture a frame range and encode it to video with FFmpeg", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a frame range and encode it
    Encode(commands::EncodeArgs),

    /// List codecs, containers, presets and frame rates
    #[command(alias = "ls")]
    List,

    /// Show encoder version and codec support
    Info(commands::InfoArgs),

    /// Manage the configuration file
    Config(commands::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Encode(args) => commands::encode(args).await,
        Commands::List => commands::list().await,
        Commands::Info(args) => commands::info(args).await,
        Commands::Config(args) => commands::config(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    // Set up logging based on verbosity
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("playblast={}", level).parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Print the error chain and a hint, and pick the exit code
fn report_error(err: &anyhow::Error) -> ExitCode {
    let playblast = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<PlayblastError>());

    if let Some(PlayblastError::Cancelled) = playblast.map(PlayblastError::root) {
        eprintln!("Encode cancelled.");
        return ExitCode::from(130);
    }

    eprintln!("Error: {:#}", err);
    if let Some(hint) = playblast.and_then(PlayblastError::user_hint) {
        eprintln!("Hint: {}", hint);
    }
    ExitCode::FAILURE
}
