//! Config command - inspect and create the config file

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use playblast_core::config::{sample_config, ConfigFile};
use std::path::PathBuf;

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print where the config file is read from
    Path,

    /// Print the effective settings from the config file
    Show,

    /// Write the commented sample config to the default location
    Init {
        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the commented sample config
    Sample,

    /// Print the built-in defaults as TOML
    Defaults,

    /// Store the ffmpeg path in the config file
    Encoder {
        /// Path to the ffmpeg executable
        path: PathBuf,
    },
}

/// Run config subcommand
pub async fn config(args: ConfigArgs) -> Result<()> {
    let path = ConfigFile::default_path();

    match args.command {
        ConfigCommand::Path => {
            let state = if path.is_file() { "present" } else { "absent, defaults apply" };
            println!("{} ({})", path.display(), state);
        }
        ConfigCommand::Show => {
            if !path.is_file() {
                println!("No config file at {}; built-in defaults apply.", path.display());
                println!("Run 'playblast config init' to create one.");
                return Ok(());
            }
            let config = ConfigFile::load_from(path.clone())?;
            println!("# {}", path.display());
            print!("{}", config.to_toml()?);
        }
        ConfigCommand::Init { force } => {
            if ConfigFile::init_at(&path, force).context("Failed to create config file")? {
                println!("Wrote {}", path.display());
            } else {
                println!("{} already exists; pass --force to replace it.", path.display());
            }
        }
        ConfigCommand::Sample => print!("{}", sample_config()),
        ConfigCommand::Defaults => print!("{}", ConfigFile::default().to_toml()?),
        ConfigCommand::Encoder { path: encoder } => {
            let mut config = ConfigFile::load_from(path.clone())?;
            config.encoder.path = encoder;
            config.save_to(path.clone())?;
            println!(
                "Encoder set to {} in {}",
                config.encoder.path.display(),
                path.display()
            );
        }
    }

    Ok(())
}
