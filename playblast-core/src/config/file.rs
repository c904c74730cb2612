//! Configuration file loading and merging
//!
//! Loads user defaults from `~/.config/playblast/config.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{Container, Crf, FrameRate, ImageFormat, SpeedPreset, VideoCodec};
use crate::error::{PlayblastError, Result};

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Encoder binary settings
    #[serde(default)]
    pub encoder: EncoderSettings,

    /// Default encode settings
    #[serde(default)]
    pub defaults: DefaultSettings,
}

/// Encoder binary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// Path to the ffmpeg executable
    #[serde(default = "default_encoder_path")]
    pub path: PathBuf,
}

/// Default encode settings, overridden by CLI flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultSettings {
    #[serde(default)]
    pub fps: FrameRate,

    #[serde(default)]
    pub codec: VideoCodec,

    #[serde(default)]
    pub preset: SpeedPreset,

    #[serde(default)]
    pub crf: Crf,

    #[serde(default)]
    pub container: Container,

    #[serde(default)]
    pub image_format: ImageFormat,

    /// Render HUD/ornaments into captured frames
    #[serde(default)]
    pub ornaments: bool,

    /// Delete captured frames after encoding
    #[serde(default = "default_true")]
    pub cleanup: bool,
}

fn default_encoder_path() -> PathBuf {
    PathBuf::from(if cfg!(windows) { "ffmpeg.exe" } else { "/usr/bin/ffmpeg" })
}

fn default_true() -> bool {
    true
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            path: default_encoder_path(),
        }
    }
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            fps: FrameRate::default(),
            codec: VideoCodec::default(),
            preset: SpeedPreset::default(),
            crf: Crf::default(),
            container: Container::default(),
            image_format: ImageFormat::default(),
            ornaments: false,
            cleanup: true,
        }
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        match dirs::config_dir() {
            Some(config_dir) => config_dir.join("playblast").join("config.toml"),
            None => PathBuf::from("playblast.toml"),
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| PlayblastError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| PlayblastError::Config(format!("Failed to parse config file: {}", e)))?;

        if !config.defaults.codec.supports(config.defaults.container) {
            return Err(PlayblastError::Config(format!(
                "default container '{}' is not supported by {}",
                config.defaults.container, config.defaults.codec
            )));
        }

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, logging warnings but returning defaults on error
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PlayblastError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        write_config(&path, &self.to_toml()?)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Write the commented sample to `path`
    ///
    /// Returns `false` without touching the file if it exists and `force` is off.
    pub fn init_at(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            debug!("Config file {:?} exists, not overwriting", path);
            return Ok(false);
        }
        write_config(path, &sample_config())?;
        info!("Wrote sample configuration to {:?}", path);
        Ok(true)
    }
}

fn write_config(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlayblastError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }
    }

    std::fs::write(path, content)
        .map_err(|e| PlayblastError::Config(format!("Failed to write config file: {}", e)))
}

/// Generate a sample configuration file
pub fn sample_config() -> String {
    r#"# Playblast Configuration

[encoder]
# Path to the ffmpeg executable
path = "/usr/bin/ffmpeg"

[defaults]
# Frame rate: 24, 25, 30, 48, 60, 120
fps = 60

# Video codec: libx264, libx265
codec = "libx264"

# Speed preset: ultrafast, superfast, veryfast, faster, fast, medium, slow, slower, veryslow
preset = "medium"

# Constant rate factor, 16 (best quality) to 28 (smallest file)
crf = 23

# Container: mp4, mkv, avi, mov for libx264; hevc, mp4, mov, mkv for libx265
container = "mp4"

# Image format for captured frames: png, jpg, tif
image_format = "png"

# Include HUD/ornaments in captured frames
ornaments = false

# Delete captured frames once the video is written
cleanup = true
"#
    .to_string()
}
