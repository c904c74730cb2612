//! Configuration types for Playblast
//!
//! Provides the enumerated encoder options and the optional config file.

mod file;

pub use file::{sample_config, ConfigFile, DefaultSettings, EncoderSettings};

use serde::{Deserialize, Serialize};

use crate::error::{PlayblastError, Result};

/// Video codec passed to FFmpeg's `-c:v`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    /// H.264 via x264 (most compatible)
    #[default]
    Libx264,
    /// H.265 / HEVC via x265 (better compression)
    Libx265,
}

impl VideoCodec {
    /// All supported codecs, in menu order
    pub const ALL: [VideoCodec; 2] = [Self::Libx264, Self::Libx265];

    /// Get the FFmpeg encoder name
    pub fn ffmpeg_encoder(&self) -> &'static str {
        match self {
            Self::Libx264 => "libx264",
            Self::Libx265 => "libx265",
        }
    }

    /// Containers this codec can be muxed into, default first
    pub fn containers(&self) -> &'static [Container] {
        match self {
            Self::Libx264 => &[Container::Mp4, Container::Mkv, Container::Avi, Container::Mov],
            Self::Libx265 => &[Container::Hevc, Container::Mp4, Container::Mov, Container::Mkv],
        }
    }

    /// Whether `container` is valid for this codec
    pub fn supports(&self, container: Container) -> bool {
        self.containers().contains(&container)
    }

    /// Container selected when switching to this codec
    pub fn default_container(&self) -> Container {
        self.containers()[0]
    }
}

impl std::fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ffmpeg_encoder())
    }
}

impl std::str::FromStr for VideoCodec {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "libx264" | "x264" | "h264" => Ok(Self::Libx264),
            "libx265" | "x265" | "h265" | "hevc" => Ok(Self::Libx265),
            _ => Err(PlayblastError::invalid_option(format!("unknown codec '{}'", s))),
        }
    }
}

/// x264/x265 speed preset, fastest to slowest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    #[default]
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl SpeedPreset {
    /// The full ladder in order
    pub const ALL: [SpeedPreset; 9] = [
        Self::Ultrafast,
        Self::Superfast,
        Self::Veryfast,
        Self::Faster,
        Self::Fast,
        Self::Medium,
        Self::Slow,
        Self::Slower,
        Self::Veryslow,
    ];

    /// Get the value for FFmpeg's `-preset`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ultrafast => "ultrafast",
            Self::Superfast => "superfast",
            Self::Veryfast => "veryfast",
            Self::Faster => "faster",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::Slower => "slower",
            Self::Veryslow => "veryslow",
        }
    }
}

impl std::fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SpeedPreset {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| PlayblastError::invalid_option(format!("unknown preset '{}'", s)))
    }
}

/// Output frame rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum FrameRate {
    Fps24,
    Fps25,
    Fps30,
    Fps48,
    #[default]
    Fps60,
    Fps120,
}

impl FrameRate {
    /// Every selectable rate
    pub const ALL: [FrameRate; 6] = [
        Self::Fps24,
        Self::Fps25,
        Self::Fps30,
        Self::Fps48,
        Self::Fps60,
        Self::Fps120,
    ];

    /// Frames per second
    pub fn fps(&self) -> u32 {
        match self {
            Self::Fps24 => 24,
            Self::Fps25 => 25,
            Self::Fps30 => 30,
            Self::Fps48 => 48,
            Self::Fps60 => 60,
            Self::Fps120 => 120,
        }
    }

    /// Look up an enumerated rate
    pub fn from_fps(fps: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.fps() == fps)
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fps())
    }
}

impl std::str::FromStr for FrameRate {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::from_fps)
            .ok_or_else(|| PlayblastError::invalid_option(format!("unsupported frame rate '{}'", s)))
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = String;

    fn try_from(fps: u32) -> std::result::Result<Self, Self::Error> {
        Self::from_fps(fps).ok_or_else(|| format!("unsupported frame rate {}", fps))
    }
}

impl From<FrameRate> for u32 {
    fn from(rate: FrameRate) -> Self {
        rate.fps()
    }
}

/// Constant rate factor; lower is higher quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Crf(u8);

impl Crf {
    pub const MIN: u8 = 16;
    pub const MAX: u8 = 28;

    /// Validate a CRF value
    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(PlayblastError::CrfOutOfRange(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Crf {
    fn default() -> Self {
        Self(23)
    }
}

impl std::fmt::Display for Crf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Crf {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| PlayblastError::invalid_option(format!("CRF '{}' is not an integer", s)))?;
        Self::new(value)
    }
}

impl TryFrom<i64> for Crf {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        Self::new(value).map_err(|e| e.to_string())
    }
}

impl From<Crf> for u8 {
    fn from(crf: Crf) -> Self {
        crf.0
    }
}

/// Output container, named by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    #[default]
    Mp4,
    Mkv,
    Avi,
    Mov,
    /// Raw HEVC elementary stream
    Hevc,
}

impl Container {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "mkv",
            Self::Avi => "avi",
            Self::Mov => "mov",
            Self::Hevc => "hevc",
        }
    }
}

impl std::fmt::Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for Container {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "mkv" => Ok(Self::Mkv),
            "avi" => Ok(Self::Avi),
            "mov" => Ok(Self::Mov),
            "hevc" => Ok(Self::Hevc),
            _ => Err(PlayblastError::invalid_option(format!("unknown container '{}'", s))),
        }
    }
}

/// Still image format written by the capturer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Tif,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Tif => "tif",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = PlayblastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "tif" | "tiff" => Ok(Self::Tif),
            _ => Err(PlayblastError::invalid_option(format!("unknown image format '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_containers() {
        assert!(VideoCodec::Libx264.supports(Container::Avi));
        assert!(!VideoCodec::Libx265.supports(Container::Avi));
        assert!(VideoCodec::Libx265.supports(Container::Hevc));
        assert!(!VideoCodec::Libx264.supports(Container::Hevc));
        assert_eq!(VideoCodec::Libx265.default_container(), Container::Hevc);
    }

    #[test]
    fn test_preset_ladder_is_ordered() {
        for pair in SpeedPreset::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!("VerySlow".parse::<SpeedPreset>().ok(), Some(SpeedPreset::Veryslow));
    }

    #[test]
    fn test_crf_bounds() {
        assert!(Crf::new(15).is_err());
        assert_eq!(Crf::new(16).map(|c| c.value()).ok(), Some(16));
        assert_eq!(Crf::new(28).map(|c| c.value()).ok(), Some(28));
        assert!(Crf::new(29).is_err());
        assert!(matches!(Crf::new(-3), Err(PlayblastError::CrfOutOfRange(-3))));
    }

    #[test]
    fn test_frame_rate_enumeration() {
        assert_eq!("48".parse::<FrameRate>().ok(), Some(FrameRate::Fps48));
        assert!("50".parse::<FrameRate>().is_err());
        assert!("sixty".parse::<FrameRate>().is_err());
    }
}
