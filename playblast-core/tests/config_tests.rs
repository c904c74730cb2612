//! Integration tests for configuration system

use playblast_core::config::{
    sample_config, ConfigFile, Container, Crf, FrameRate, ImageFormat, SpeedPreset, VideoCodec,
};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_codec_containers() {
    assert_eq!(
        VideoCodec::Libx264.containers(),
        &[Container::Mp4, Container::Mkv, Container::Avi, Container::Mov]
    );
    assert_eq!(
        VideoCodec::Libx265.containers(),
        &[Container::Hevc, Container::Mp4, Container::Mov, Container::Mkv]
    );
    assert!(!VideoCodec::Libx264.supports(Container::Hevc));
    assert!(!VideoCodec::Libx265.supports(Container::Avi));
    assert_eq!(VideoCodec::Libx265.default_container(), Container::Hevc);
}

#[test]
fn test_codec_from_string() {
    assert_eq!("libx264".parse::<VideoCodec>().unwrap(), VideoCodec::Libx264);
    assert_eq!("h265".parse::<VideoCodec>().unwrap(), VideoCodec::Libx265);
    assert!("vp9".parse::<VideoCodec>().is_err());
}

#[test]
fn test_preset_order() {
    assert_eq!(SpeedPreset::ALL.len(), 9);
    assert_eq!(SpeedPreset::ALL[0], SpeedPreset::Ultrafast);
    assert_eq!(SpeedPreset::ALL[8], SpeedPreset::Veryslow);
    assert!(SpeedPreset::Fast < SpeedPreset::Slow);
    assert_eq!(SpeedPreset::default(), SpeedPreset::Medium);
    assert_eq!("veryslow".parse::<SpeedPreset>().unwrap().as_str(), "veryslow");
}

#[test]
fn test_frame_rates() {
    let rates: Vec<u32> = [24, 25, 30, 48, 60, 120]
        .into_iter()
        .map(|fps| FrameRate::from_fps(fps).unwrap().fps())
        .collect();
    assert_eq!(rates, vec![24, 25, 30, 48, 60, 120]);
    assert_eq!(FrameRate::from_fps(29), None);
    assert_eq!(FrameRate::default().fps(), 60);
}

#[test]
fn test_crf_bounds() {
    assert_eq!(Crf::new(16).unwrap().value(), 16);
    assert_eq!(Crf::new(28).unwrap().value(), 28);
    assert!(Crf::new(15).is_err());
    assert!(Crf::new(29).is_err());
    assert!("51".parse::<Crf>().is_err());
    assert_eq!(Crf::default().value(), 23);
}

#[test]
fn test_image_format_aliases() {
    assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpg);
    assert_eq!("TIFF".parse::<ImageFormat>().unwrap(), ImageFormat::Tif);
    assert_eq!(ImageFormat::Png.extension(), "png");
}

#[test]
fn test_config_file_default_values() {
    let config = ConfigFile::default();

    assert_eq!(config.defaults.codec, VideoCodec::Libx264);
    assert_eq!(config.defaults.container, Container::Mp4);
    assert_eq!(config.defaults.image_format, ImageFormat::Png);
    assert!(!config.defaults.ornaments);
    assert!(config.defaults.cleanup);
}

#[test]
fn test_config_file_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = ConfigFile::default();
    config.encoder.path = PathBuf::from("/opt/ffmpeg/bin/ffmpeg");
    config.defaults.fps = FrameRate::Fps24;
    config.defaults.codec = VideoCodec::Libx265;
    config.defaults.container = Container::Mkv;
    config.defaults.crf = Crf::new(18).unwrap();
    config.defaults.cleanup = false;

    config.save_to(config_path.clone()).unwrap();
    assert!(config_path.exists());

    let loaded = ConfigFile::load_from(config_path).unwrap();
    assert_eq!(loaded.encoder.path, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
    assert_eq!(loaded.defaults.fps, FrameRate::Fps24);
    assert_eq!(loaded.defaults.codec, VideoCodec::Libx265);
    assert_eq!(loaded.defaults.container, Container::Mkv);
    assert_eq!(loaded.defaults.crf.value(), 18);
    assert!(!loaded.defaults.cleanup);
}

#[test]
fn test_config_file_missing_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigFile::load_from(temp_dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.defaults.fps, FrameRate::Fps60);
}

#[test]
fn test_config_file_partial() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[defaults]\nfps = 30\npreset = \"slow\"\n").unwrap();

    let config = ConfigFile::load_from(config_path).unwrap();
    assert_eq!(config.defaults.fps, FrameRate::Fps30);
    assert_eq!(config.defaults.preset, SpeedPreset::Slow);
    // Unspecified values fall back to defaults
    assert_eq!(config.defaults.crf.value(), 23);
    assert!(config.defaults.cleanup);
}

#[test]
fn test_config_file_rejects_mismatched_container() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[defaults]\ncodec = \"libx264\"\ncontainer = \"hevc\"\n").unwrap();

    let err = ConfigFile::load_from(config_path).unwrap_err();
    assert!(err.to_string().contains("hevc"));
}

#[test]
fn test_config_file_malformed() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[defaults\nfps = ").unwrap();

    assert!(ConfigFile::load_from(config_path).is_err());
}

#[test]
fn test_init_writes_sample_once() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("playblast").join("config.toml");

    assert!(ConfigFile::init_at(&config_path, false).unwrap());
    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), sample_config());

    std::fs::write(&config_path, "[defaults]\nfps = 24\n").unwrap();
    assert!(!ConfigFile::init_at(&config_path, false).unwrap());
    let kept = ConfigFile::load_from(config_path.clone()).unwrap();
    assert_eq!(kept.defaults.fps, FrameRate::Fps24);

    assert!(ConfigFile::init_at(&config_path, true).unwrap());
    let reset = ConfigFile::load_from(config_path).unwrap();
    assert_eq!(reset.defaults.fps, FrameRate::Fps60);
}

#[test]
fn test_to_toml_round_trips() {
    let mut config = ConfigFile::default();
    config.defaults.preset = SpeedPreset::Veryfast;
    config.defaults.image_format = ImageFormat::Tif;

    let text = config.to_toml().unwrap();
    assert!(text.contains("preset = \"veryfast\""));
    assert!(text.contains("crf = 23"));

    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, text).unwrap();
    let loaded = ConfigFile::load_from(config_path).unwrap();
    assert_eq!(loaded.defaults.preset, SpeedPreset::Veryfast);
    assert_eq!(loaded.defaults.image_format, ImageFormat::Tif);
}

#[test]
fn test_sample_config_is_valid() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, sample_config()).unwrap();

    let config = ConfigFile::load_from(config_path).unwrap();
    assert_eq!(config.defaults.preset, SpeedPreset::Medium);
}
