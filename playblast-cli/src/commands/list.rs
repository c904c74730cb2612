//! List command - show accepted option values

use anyhow::Result;
use playblast_core::config::{Crf, FrameRate, ImageFormat, SpeedPreset, VideoCodec};

/// Print every enumerated option with its defaults
pub async fn list() -> Result<()> {
    println!("Playblast - Encoder Options\n");

    println!("{:<10} {:<30}", "Codec", "Containers (default first)");
    println!("{}", "-".repeat(40));
    for codec in VideoCodec::ALL {
        let containers: Vec<_> = codec.containers().iter().map(|c| c.to_string()).collect();
        println!("{:<10} {}", codec, containers.join(", "));
    }
    println!();

    let presets: Vec<_> = SpeedPreset::ALL.iter().map(|p| p.as_str()).collect();
    println!("Presets:      {} (default: {})", presets.join(", "), SpeedPreset::default());

    let rates: Vec<_> = FrameRate::ALL.iter().map(|r| r.to_string()).collect();
    println!("Frame rates:  {} (default: {})", rates.join(", "), FrameRate::default());

    println!(
        "CRF:          {}-{} (default: {}, lower is better quality)",
        Crf::MIN,
        Crf::MAX,
        Crf::default().value()
    );

    println!(
        "Image format: {}, {}, {} (default: {})",
        ImageFormat::Png,
        ImageFormat::Jpg,
        ImageFormat::Tif,
        ImageFormat::default()
    );

    Ok(())
}
