//! Video inspection and fast-start remuxing

pub mod faststart;
pub mod probe;

pub use faststart::{processing_path, FastStartTranscoder, FfmpegFastStart, TranscodeError};
pub use probe::{FfprobeProbe, MediaProbe, ProbeError, StreamGeometry};
