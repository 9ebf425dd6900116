//! Stream geometry extraction via ffprobe

use async_trait::async_trait;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tubely_core::AspectCategory;

use crate::tool::validate_tool_path;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid ffprobe path: {0}")]
    InvalidToolPath(String),

    #[error("Failed to run ffprobe: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("ffprobe exited with status {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },

    #[error("Malformed ffprobe output: {0}")]
    MalformedOutput(String),

    #[error("No streams found in file")]
    NoStreams,

    #[error("Invalid stream dimensions {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
}

/// Pixel size of a file's first stream. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamGeometry {
    pub width: u32,
    pub height: NonZeroU32,
}

impl StreamGeometry {
    pub fn new(width: u32, height: u32) -> Result<Self, ProbeError> {
        match NonZeroU32::new(height) {
            Some(h) if width > 0 => Ok(Self { width, height: h }),
            _ => Err(ProbeError::InvalidGeometry { width, height }),
        }
    }

    pub fn aspect_category(&self) -> AspectCategory {
        AspectCategory::classify(self.width, self.height)
    }
}

/// Inspects a local media file without decoding it.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<StreamGeometry, ProbeError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output into the first
/// stream's geometry.
pub fn parse_probe_output(stdout: &[u8]) -> Result<StreamGeometry, ProbeError> {
    let output: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::MalformedOutput(e.to_string()))?;
    let first = output.streams.first().ok_or(ProbeError::NoStreams)?;
    StreamGeometry::new(first.width.unwrap_or(0), first.height.unwrap_or(0))
}

/// [`MediaProbe`] backed by the ffprobe binary.
pub struct FfprobeProbe {
    ffprobe_path: String,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Result<Self, ProbeError> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path).map_err(ProbeError::InvalidToolPath)?;
        Ok(Self { ffprobe_path })
    }
}

#[async_trait]
impl MediaProbe for FfprobeProbe {
    #[tracing::instrument(skip_all, fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        file.path = %path.display(),
    ))]
    async fn probe(&self, path: &Path) -> Result<StreamGeometry, ProbeError> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(ProbeError::Spawn)?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let geometry = parse_probe_output(&output.stdout)?;
        tracing::debug!(
            width = geometry.width,
            height = geometry.height.get(),
            "Probed stream geometry"
        );
        Ok(geometry)
    }
}
