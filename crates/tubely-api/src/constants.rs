//! API constants

/// Route for video uploads; `{video_id}` is the target record.
pub const VIDEO_UPLOAD_ROUTE: &str = "/api/video_upload/{video_id}";

/// Service name reported by health checks and logs.
pub const SERVICE_NAME: &str = "tubely";
