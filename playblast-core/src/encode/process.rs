//! Encoder child process execution
//!
//! Runs FFmpeg asynchronously, forwarding its stderr line by line and
//! honouring cancellation. The child is killed if the future is dropped.

use serde::Serialize;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

use super::command::EncoderCommand;
use crate::error::{PlayblastError, Result};

/// Events emitted while the encoder runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeEvent {
    /// One line of encoder diagnostic output
    Output(String),
    /// Frames encoded so far
    Progress { frame: u64, total: u64 },
}

/// How the encoder process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Termination {
    /// Process exited with a status code
    Exited(i32),
    /// Process was killed by a signal
    Signaled(i32),
    /// We killed it on request
    Cancelled,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exited with code {}", code),
            Self::Signaled(sig) => write!(f, "killed by signal {}", sig),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of one encoder run
#[derive(Debug, Clone, Serialize)]
pub struct EncodeOutcome {
    pub termination: Termination,
    pub stdout: String,
    pub stderr: String,
    pub output_path: PathBuf,
    /// Output file existed after the process ended
    pub output_present: bool,
}

impl EncodeOutcome {
    /// Clean exit and the output file was written
    pub fn success(&self) -> bool {
        self.termination == Termination::Exited(0) && self.output_present
    }

    /// Process exit code, if it exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self.termination {
            Termination::Exited(code) => Some(code),
            _ => None,
        }
    }
}

/// Requests cancellation of a running encode
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observed by the encode to learn it was cancelled
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

/// Create a linked cancel handle and token
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelToken {
    /// A token that never fires
    pub fn never() -> Self {
        cancel_pair().1
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation was requested
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                // Handle dropped without cancelling
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Run the encoder to completion or cancellation
///
/// `total_frames` is only used to scale progress events.
pub async fn run_encoder(
    command: &EncoderCommand,
    total_frames: u64,
    events: Option<mpsc::Sender<EncodeEvent>>,
    mut cancel: CancelToken,
) -> Result<EncodeOutcome> {
    info!("Running encoder: {}", command);

    let mut child = command
        .to_command()
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            PlayblastError::encode(format!("Failed to start {:?}: {}", command.program(), e))
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout {
            out.read_to_end(&mut buf).await?;
        }
        Ok::<_, std::io::Error>(buf)
    });
    let stderr_task = tokio::spawn(read_diagnostics(stderr, events, total_frames));

    let termination = tokio::select! {
        status = child.wait() => classify(status?),
        _ = cancel.cancelled() => {
            warn!("Cancelling encoder");
            child.kill().await?;
            Termination::Cancelled
        }
    };

    let stdout = join_stream(stdout_task).await?;
    let stderr = join_stream(stderr_task).await?;

    let output_path = command.output().to_path_buf();
    let output_present = termination != Termination::Cancelled && output_path.is_file();

    debug!(
        "Encoder {} ({} bytes stdout, {} bytes stderr)",
        termination,
        stdout.len(),
        stderr.len()
    );

    Ok(EncodeOutcome {
        termination,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        output_path,
        output_present,
    })
}

async fn join_stream(
    task: tokio::task::JoinHandle<std::io::Result<Vec<u8>>>,
) -> Result<Vec<u8>> {
    task.await
        .map_err(|e| PlayblastError::encode(format!("Output reader failed: {}", e)))?
        .map_err(PlayblastError::from)
}

/// Collect stderr verbatim while forwarding lines and progress
async fn read_diagnostics<R>(
    reader: Option<R>,
    events: Option<mpsc::Sender<EncodeEvent>>,
    total: u64,
) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut all = Vec::new();
    let Some(mut reader) = reader else {
        return Ok(all);
    };

    let mut chunk = [0u8; 4096];
    let mut line = Vec::new();
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        all.extend_from_slice(&chunk[..n]);

        for &byte in &chunk[..n] {
            // FFmpeg redraws its status line with '\r'
            if byte == b'\n' || byte == b'\r' {
                emit_line(&mut line, events.as_ref(), total);
            } else {
                line.push(byte);
            }
        }
    }
    emit_line(&mut line, events.as_ref(), total);

    Ok(all)
}

fn emit_line(line: &mut Vec<u8>, events: Option<&mpsc::Sender<EncodeEvent>>, total: u64) {
    if line.is_empty() {
        return;
    }
    let text = String::from_utf8_lossy(line).trim_end().to_string();
    line.clear();
    if text.is_empty() {
        return;
    }

    trace!("ffmpeg: {}", text);
    let Some(events) = events else {
        return;
    };

    // Never block on the receiver; events are dropped while it is full or closed
    if let Some(frame) = parse_progress_frame(&text) {
        forward(events, EncodeEvent::Progress { frame, total });
    }
    forward(events, EncodeEvent::Output(text));
}

fn forward(events: &mpsc::Sender<EncodeEvent>, event: EncodeEvent) {
    if let Err(mpsc::error::TrySendError::Full(event)) = events.try_send(event) {
        trace!("Event channel full, dropping {:?}", event);
    }
}

/// Frame count from an FFmpeg status line such as `frame=  42 fps=...`
pub fn parse_progress_frame(line: &str) -> Option<u64> {
    let start = line.find("frame=")? + "frame=".len();
    let value = line[start..].trim_start();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

#[cfg(unix)]
fn classify(status: ExitStatus) -> Termination {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => Termination::Exited(code),
        (None, Some(signal)) => Termination::Signaled(signal),
        (None, None) => Termination::Exited(-1),
    }
}

#[cfg(not(unix))]
fn classify(status: ExitStatus) -> Termination {
    Termination::Exited(status.code().unwrap_or(-1))
}
