//! Tubely media processing
//!
//! Wrappers around the external media tools (ffprobe, ffmpeg) used by video
//! ingestion, plus the scoped temp-file guard that stages uploads on disk.

pub mod temp;
pub mod tool;
pub mod video;

pub use temp::TempArtifact;
pub use video::{
    processing_path, FastStartTranscoder, FfmpegFastStart, FfprobeProbe, MediaProbe, ProbeError,
    StreamGeometry, TranscodeError,
};
