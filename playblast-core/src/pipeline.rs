//! Capture-to-encode pipeline
//!
//! Orchestrates one cycle: scratch directory, frame capture, concat manifest,
//! encoder run, report. The scratch directory is removed on every exit path.

use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::capture::{CaptureJob, FrameCapturer};
use crate::encode::{run_encoder, CancelToken, EncodeEvent, EncodeOutcome, EncoderCommand, Termination};
use crate::error::{PlayblastError, Result, ResultExt};
use crate::manifest::ConcatManifest;
use crate::request::{EncodeRequest, RawRequest};
use crate::scratch::ScratchDir;

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    /// Nothing has run yet
    Idle,
    /// Capturer is writing frames
    Capturing,
    /// Encoder process is running
    Encoding,
    /// Last run produced a video
    Finished,
    /// Last run failed
    Failed,
    /// Last run was cancelled
    Cancelled,
}

impl PipelineState {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Capturing | Self::Encoding)
    }
}

/// What a finished run produced, shown to the user as the log
#[derive(Debug, Clone, Serialize)]
pub struct EncodeReport {
    /// Command line that was executed
    pub command: String,
    /// Frames handed to the encoder
    pub frames: u64,
    pub elapsed_seconds: f64,
    pub success: bool,
    /// Captured frames left on disk when cleanup was disabled
    pub kept_frames: Option<PathBuf>,
    pub outcome: EncodeOutcome,
}

impl EncodeReport {
    /// Turn an unsuccessful report into an error
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let reason = if self.outcome.output_present {
            format!("encoder {}", self.outcome.termination)
        } else {
            format!(
                "encoder {}, no output at {:?}",
                self.outcome.termination, self.outcome.output_path
            )
        };
        Err(PlayblastError::encode(reason))
    }
}

impl std::fmt::Display for EncodeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.command)?;
        writeln!(f)?;
        if !self.outcome.stdout.trim().is_empty() {
            writeln!(f, "{}", self.outcome.stdout.trim_end())?;
        }
        writeln!(f, "{}", self.outcome.stderr.trim_end())?;
        if let Some(dir) = &self.kept_frames {
            writeln!(f, "Captured frames kept in:\n '{}'", dir.display())?;
        }
        if self.success {
            write!(
                f,
                "Successfully created:\n '{}'",
                self.outcome.output_path.display()
            )
        } else {
            write!(
                f,
                "Encode failed ({}), expected output:\n '{}'",
                self.outcome.termination,
                self.outcome.output_path.display()
            )
        }
    }
}

/// Main Playblast pipeline
///
/// Runs one request at a time; overlapping runs fail with
/// [`PlayblastError::EncodeInProgress`].
pub struct Pipeline {
    capturer: Arc<dyn FrameCapturer>,
    state: Arc<Mutex<PipelineState>>,
    scratch_root: Option<PathBuf>,
    events: Option<mpsc::Sender<EncodeEvent>>,
}

impl Pipeline {
    /// Create a pipeline around a capturer
    pub fn new(capturer: Arc<dyn FrameCapturer>) -> Self {
        Self {
            capturer,
            state: Arc::new(Mutex::new(PipelineState::Idle)),
            scratch_root: None,
            events: None,
        }
    }

    /// Create scratch directories under `root` instead of the system temp dir
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Forward encoder output and progress to `events`
    pub fn with_events(mut self, events: mpsc::Sender<EncodeEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> PipelineState {
        *self.state.lock()
    }

    /// Validate raw user input, then run
    ///
    /// Validation failures return before anything is written to disk.
    pub async fn run_raw(&self, raw: &RawRequest, cancel: CancelToken) -> Result<EncodeReport> {
        let request = raw.validate()?;
        self.run(request, cancel).await
    }

    /// Capture and encode one validated request
    pub async fn run(&self, request: EncodeRequest, cancel: CancelToken) -> Result<EncodeReport> {
        let guard = RunGuard::acquire(&self.state)?;

        let result = self.run_inner(&request, &guard, cancel).await;
        match &result {
            Ok(report) if report.success => guard.finish(PipelineState::Finished),
            Ok(_) => guard.finish(PipelineState::Failed),
            Err(PlayblastError::Cancelled) => guard.finish(PipelineState::Cancelled),
            Err(e) => {
                error!("Pipeline failed: {}", e);
                guard.finish(PipelineState::Failed)
            }
        }
        result
    }

    async fn run_inner(
        &self,
        request: &EncodeRequest,
        guard: &RunGuard,
        cancel: CancelToken,
    ) -> Result<EncodeReport> {
        let started = Instant::now();

        let scratch = match &self.scratch_root {
            Some(root) => ScratchDir::new_in(root)?,
            None => ScratchDir::new()?,
        };

        let job = CaptureJob {
            start_frame: request.start_frame,
            end_frame: request.end_frame,
            padding: request.frame_padding(),
            include_ornaments: request.include_ornaments,
            image_format: request.image_format,
            output_dir: scratch.path().to_path_buf(),
            stem: request.frame_stem(),
        };
        info!(
            "Capturing frames {}..={} into {:?}",
            job.start_frame, job.end_frame, job.output_dir
        );

        let capturer = Arc::clone(&self.capturer);
        let capture_job = job.clone();
        tokio::task::spawn_blocking(move || capturer.capture(&capture_job))
            .await
            .map_err(|e| PlayblastError::capture(format!("Capture task failed: {}", e)))?
            .context("Capturing frames")?;

        if cancel.is_cancelled() {
            return Err(PlayblastError::Cancelled);
        }

        let sequence = job.sequence();
        sequence.verify_present()?;

        let manifest = ConcatManifest::from_sequence(&sequence);
        let manifest_path = manifest.write_to(scratch.path())?;

        let command = EncoderCommand::for_request(request, &manifest_path);
        debug!("Encoder command: {}", command);

        guard.set(PipelineState::Encoding);
        let outcome = run_encoder(&command, manifest.len() as u64, self.events.clone(), cancel).await?;

        if outcome.termination == Termination::Cancelled {
            return Err(PlayblastError::Cancelled);
        }

        let success = outcome.success();
        if success {
            info!("Successfully created {:?}", outcome.output_path);
        } else {
            warn!(
                "Encoder {} (output present: {})",
                outcome.termination, outcome.output_present
            );
        }

        let kept_frames = if request.cleanup {
            None
        } else {
            Some(scratch.keep())
        };

        Ok(EncodeReport {
            command: command.display(),
            frames: manifest.len() as u64,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            success,
            kept_frames,
            outcome,
        })
    }
}

/// Marks the pipeline busy for the duration of one run
struct RunGuard {
    state: Arc<Mutex<PipelineState>>,
    done: bool,
}

impl RunGuard {
    fn acquire(state: &Arc<Mutex<PipelineState>>) -> Result<Self> {
        let mut current = state.lock();
        if current.is_busy() {
            return Err(PlayblastError::EncodeInProgress);
        }
        *current = PipelineState::Capturing;
        Ok(Self {
            state: Arc::clone(state),
            done: false,
        })
    }

    fn set(&self, next: PipelineState) {
        *self.state.lock() = next;
    }

    fn finish(mut self, last: PipelineState) {
        self.set(last);
        self.done = true;
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        // Run future dropped mid-flight
        if !self.done {
            *self.state.lock() = PipelineState::Cancelled;
        }
    }
}
