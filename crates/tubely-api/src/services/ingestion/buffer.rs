//! Authorized -> Buffered: validate the video part and stream it to disk.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tubely_core::constants::SUPPORTED_VIDEO_CONTENT_TYPE;
use tubely_core::AppError;

/// Check the declared content type of the video part.
///
/// Parameters (`; codecs=...`) are ignored and the comparison is
/// case-insensitive. Returns the normalized media type.
pub fn validate_video_content_type(declared: Option<&str>) -> Result<String, AppError> {
    let declared = declared
        .ok_or_else(|| AppError::BadRequest("Missing Content-Type for video".to_string()))?;

    let media_type = declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    let well_formed = media_type
        .split_once('/')
        .map(|(kind, sub)| !kind.is_empty() && !sub.is_empty() && !sub.contains('/'))
        .unwrap_or(false);
    if !well_formed {
        return Err(AppError::BadRequest(format!(
            "Invalid Content-Type: {}",
            declared
        )));
    }

    if media_type != SUPPORTED_VIDEO_CONTENT_TYPE {
        return Err(AppError::UnsupportedMediaType(format!(
            "Invalid file type {}, only {} is allowed",
            media_type, SUPPORTED_VIDEO_CONTENT_TYPE
        )));
    }

    Ok(media_type)
}

/// Map a multipart read failure. Body-limit violations become 413.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string())
    } else {
        AppError::BadRequest(format!("Unable to read upload: {}", err.body_text()))
    }
}

/// Copy a byte stream into `file` chunk by chunk and flush it.
/// Returns the number of bytes written.
pub async fn stream_to_file<S>(file: &mut File, stream: S) -> Result<u64, AppError>
where
    S: Stream<Item = Result<Bytes, AppError>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}
