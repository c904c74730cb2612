//! Mock infrastructure for testing
//!
//! Provides a fake capturer, fake encoder scripts and request builders.

#![allow(dead_code)]

use playblast_core::capture::{CaptureJob, FrameCapturer};
use playblast_core::config::{Container, Crf, FrameRate, ImageFormat, SpeedPreset, VideoCodec};
use playblast_core::error::{PlayblastError, Result};
use playblast_core::request::{EncodeRequest, RawRequest};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Minimal PNG signature; encoders are faked so content does not matter
pub const PLACEHOLDER_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Capturer that writes placeholder images for every frame in the job
#[derive(Default)]
pub struct MockCapturer {
    /// Frame to leave out, to simulate a broken capture
    pub skip_frame: Option<i64>,
    /// Fail outright instead of writing anything
    pub fail: bool,
    calls: AtomicUsize,
    last_job: Mutex<Option<CaptureJob>>,
}

impl MockCapturer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipping(frame: i64) -> Self {
        Self {
            skip_frame: Some(frame),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Job passed to the most recent capture call
    pub fn last_job(&self) -> Option<CaptureJob> {
        self.last_job.lock().clone()
    }
}

impl FrameCapturer for MockCapturer {
    fn capture(&self, job: &CaptureJob) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_job.lock() = Some(job.clone());
        if self.fail {
            return Err(PlayblastError::capture("viewport unavailable"));
        }

        let sequence = job.sequence();
        for frame in sequence.frames() {
            if Some(frame) == self.skip_frame {
                continue;
            }
            std::fs::write(sequence.frame_path(frame), PLACEHOLDER_PNG)?;
        }
        Ok(())
    }
}

/// Raw request pointing at `encoder`, as a user would fill it in
pub fn raw_request(encoder: &Path, output: &Path) -> RawRequest {
    RawRequest {
        encoder_path: encoder.to_path_buf(),
        start_frame: "1".into(),
        end_frame: "48".into(),
        fps: FrameRate::Fps24,
        codec: VideoCodec::Libx264,
        preset: SpeedPreset::Medium,
        crf: 23,
        container: Container::Mp4,
        output_path: output.to_string_lossy().into_owned(),
        include_ornaments: false,
        cleanup: true,
        image_format: ImageFormat::Png,
    }
}

/// Validated request, bypassing the encoder path check
pub fn request(encoder: &Path, output: &Path, start: i64, end: i64) -> EncodeRequest {
    EncodeRequest {
        encoder_path: encoder.to_path_buf(),
        start_frame: start,
        end_frame: end,
        fps: FrameRate::Fps24,
        codec: VideoCodec::Libx264,
        preset: SpeedPreset::Medium,
        crf: Crf::default(),
        container: Container::Mp4,
        output_path: output.to_path_buf(),
        include_ornaments: false,
        cleanup: true,
        image_format: ImageFormat::Png,
    }
}

/// Fake encoder behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeEncoder {
    /// Writes the output file and exits 0
    Succeed,
    /// Prints an error and exits 1 without output
    Fail,
    /// Writes a partial output file, then exits 1
    CrashAfterWrite,
    /// Exits 0 without writing anything
    SilentNoOutput,
    /// Sleeps until killed
    Hang,
    /// Prints a thousand progress lines, then succeeds
    Chatty,
}

/// Write an executable shell script standing in for ffmpeg
///
/// Every script records its argv to `args.txt` and copies the manifest
/// (9th argument) to `manifest.txt` next to itself.
#[cfg(unix)]
pub fn fake_encoder(dir: &Path, behaviour: FakeEncoder) -> PathBuf {
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let body = match behaviour {
        FakeEncoder::Succeed => {
            "echo 'frame=    1 fps=0.0 q=0.0 size=0kB' >&2\nprintf 'video' > \"$last\"\nexit 0\n"
        }
        FakeEncoder::Fail => "echo 'Unknown encoder' >&2\nexit 1\n",
        FakeEncoder::CrashAfterWrite => "printf 'half' > \"$last\"\necho 'Segmentation fault' >&2\nexit 1\n",
        FakeEncoder::SilentNoOutput => "exit 0\n",
        FakeEncoder::Hang => "exec sleep 30\n",
        FakeEncoder::Chatty => {
            "i=1\nwhile [ $i -le 1000 ]; do\n  echo \"frame=$i fps=0.0 q=0.0 size=0kB\" >&2\n  i=$((i + 1))\ndone\nprintf 'video' > \"$last\"\nexit 0\n"
        }
    };

    let script = format!(
        "#!/bin/sh\nhere=$(dirname \"$0\")\nprintf '%s\\n' \"$@\" > \"$here/args.txt\"\ncp \"$9\" \"$here/manifest.txt\"\nfor last; do :; done\n{}",
        body
    );

    let path = dir.join("ffmpeg");
    {
        let mut file = std::fs::File::create(&path).expect("create fake encoder");
        file.write_all(script.as_bytes()).expect("write fake encoder");
        file.sync_all().expect("sync fake encoder");
    }
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod fake encoder");
    path
}

/// Arguments the fake encoder was called with
pub fn recorded_args(encoder: &Path) -> Vec<String> {
    let args = encoder.with_file_name("args.txt");
    std::fs::read_to_string(args)
        .expect("encoder was not invoked")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Manifest the fake encoder was handed
pub fn recorded_manifest(encoder: &Path) -> String {
    std::fs::read_to_string(encoder.with_file_name("manifest.txt")).expect("manifest not copied")
}
