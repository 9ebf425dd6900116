//! Upload constants shared between configuration defaults and the ingestion pipeline.

/// Multipart form field carrying the video file.
pub const VIDEO_FORM_FIELD: &str = "video";

/// The only media type accepted for video uploads.
pub const SUPPORTED_VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Extension used for storage keys when the client filename has none.
pub const DEFAULT_VIDEO_EXTENSION: &str = ".mp4";

/// Prefix of the staged raw upload on local disk.
pub const TEMP_UPLOAD_PREFIX: &str = "tubely-upload";

/// Suffix appended to a source path to name its fast-start output.
pub const PROCESSING_SUFFIX: &str = ".processing";

/// Default request body cap (1 GiB).
pub const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 1 << 30;
