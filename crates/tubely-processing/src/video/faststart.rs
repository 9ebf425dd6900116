//! Fast-start remux via ffmpeg
//!
//! Copies every stream without re-encoding and moves the `moov` atom to the
//! front of the container so playback can begin before the download finishes.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tubely_core::constants::PROCESSING_SUFFIX;

use crate::tool::validate_tool_path;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Invalid ffmpeg path: {0}")]
    InvalidToolPath(String),

    #[error("Failed to run ffmpeg: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("ffmpeg exited with status {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },
}

/// Output path for the fast-start copy of `source`: `<source>.processing`.
pub fn processing_path(source: &Path) -> PathBuf {
    let mut name: OsString = source.as_os_str().to_owned();
    name.push(PROCESSING_SUFFIX);
    PathBuf::from(name)
}

/// Rewrites a local file into a fast-start layout at a new path.
///
/// Implementations must leave `source` untouched. On failure `output` may hold
/// partial data; the caller owns its cleanup.
#[async_trait]
pub trait FastStartTranscoder: Send + Sync {
    async fn remux(&self, source: &Path, output: &Path) -> Result<(), TranscodeError>;
}

/// [`FastStartTranscoder`] backed by the ffmpeg binary.
pub struct FfmpegFastStart {
    ffmpeg_path: String,
}

impl FfmpegFastStart {
    pub fn new(ffmpeg_path: impl Into<String>) -> Result<Self, TranscodeError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path).map_err(TranscodeError::InvalidToolPath)?;
        Ok(Self { ffmpeg_path })
    }

    fn build_command(&self, source: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(["-nostdin", "-v", "error", "-y", "-i"])
            .arg(source)
            .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
            .arg(output)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl FastStartTranscoder for FfmpegFastStart {
    #[tracing::instrument(skip_all, fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        source = %source.display(),
        output = %output.display(),
    ))]
    async fn remux(&self, source: &Path, output: &Path) -> Result<(), TranscodeError> {
        let start = std::time::Instant::now();
        let result = self
            .build_command(source, output)
            .output()
            .await
            .map_err(TranscodeError::Spawn)?;

        if !result.status.success() {
            return Err(TranscodeError::Failed {
                status: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        tracing::debug!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fast-start remux complete"
        );
        Ok(())
    }
}
