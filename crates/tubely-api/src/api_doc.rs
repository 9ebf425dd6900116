//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use tubely_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video ingestion API. Uploaded MP4s are classified by aspect ratio, remuxed for fast start and stored under a category prefix."
    ),
    paths(
        handlers::video_upload::upload_video,
    ),
    components(
        schemas(
            models::VideoResponse,
            models::AspectCategory,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "videos", description = "Video ingestion")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
