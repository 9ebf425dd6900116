use crate::auth::extract_bearer_token;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tubely_core::{AppError, VideoResponse};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/video_upload/{video_id}",
    tag = "videos",
    params(
        ("video_id" = String, Path, description = "ID of the video record that receives the upload")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video processed and stored", body = VideoResponse),
        (status = 400, description = "Invalid ID or malformed form", body = ErrorResponse),
        (status = 401, description = "Missing or invalid credential, or caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 415, description = "Video part is not MP4", body = ErrorResponse),
        (status = 500, description = "Processing, storage or database failure", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)
        .map_err(|_| AppError::BadRequest("Invalid ID".to_string()))?;
    let token = extract_bearer_token(&headers).map_err(AppError::from)?;
    let multipart = multipart.map_err(|rejection| {
        AppError::BadRequest(format!("Unable to parse form: {}", rejection.body_text()))
    })?;

    let video = state.ingestion.ingest(video_id, token, multipart).await?;

    Ok(Json(VideoResponse::from(video)))
}
