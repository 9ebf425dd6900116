//! Video ingestion
//!
//! Takes one multipart upload from the wire to a fast-start object in storage:
//! authorize, buffer to disk, probe, remux, upload, record. Temp files are
//! scoped to the request and removed on every exit path.

mod buffer;
mod pipeline;
mod types;

pub use buffer::{multipart_error, stream_to_file, validate_video_content_type};
pub use pipeline::{IngestionDeps, IngestionPipeline, IngestionSettings};
pub use types::{IngestionFailure, IngestionStage};
