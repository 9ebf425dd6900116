use axum::body::Body;
use axum::http::{header, Request};
use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use chrono::Utc;
use tubely_core::Video;
use uuid::Uuid;

use super::doubles::InMemoryVideoRepository;

/// Bytes standing in for an MP4; the doubles never parse them.
pub fn fake_mp4_bytes() -> Vec<u8> {
    let mut bytes = b"\x00\x00\x00\x18ftypmp42".to_vec();
    bytes.extend(std::iter::repeat(0xAB).take(64 * 1024));
    bytes.extend_from_slice(b"moov");
    bytes
}

pub fn video_part(bytes: Vec<u8>, content_type: &str) -> Part {
    Part::bytes(bytes)
        .file_name("boots-video.mp4")
        .mime_type(content_type)
}

/// A form with a single `video` part.
pub fn video_form(bytes: Vec<u8>, content_type: &str) -> MultipartForm {
    MultipartForm::new().add_part("video", video_part(bytes, content_type))
}

pub fn mp4_form() -> MultipartForm {
    video_form(fake_mp4_bytes(), "video/mp4")
}

/// Insert a draft video owned by `owner` and return it.
pub fn seed_video(repo: &InMemoryVideoRepository, owner: Uuid) -> Video {
    let now = Utc::now();
    let video = Video {
        id: Uuid::new_v4(),
        user_id: owner,
        title: "Boots demo".to_string(),
        description: Some("A pair of boots".to_string()),
        thumbnail_url: None,
        video_url: None,
        created_at: now,
        updated_at: now,
    };
    repo.insert(video.clone());
    video
}

pub fn upload_path(video_id: Uuid) -> String {
    format!("/api/video_upload/{}", video_id)
}

pub const RAW_BOUNDARY: &str = "tubely-test-boundary";

/// Opening and closing delimiters around a single `video` part.
pub fn raw_video_part_frame(content_type: &str) -> (Vec<u8>, Vec<u8>) {
    let head = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"video\"; filename=\"boots-video.mp4\"\r\n\
         Content-Type: {ct}\r\n\r\n",
        b = RAW_BOUNDARY,
        ct = content_type
    );
    let tail = format!("\r\n--{}--\r\n", RAW_BOUNDARY);
    (head.into_bytes(), tail.into_bytes())
}

/// Upload request whose body is sent in `chunk_size` pieces with no
/// `Content-Length`, so size limits can only be enforced while reading.
pub fn streamed_upload_request(
    video_id: Uuid,
    token: &str,
    payload: Vec<u8>,
    chunk_size: usize,
) -> Request<Body> {
    let (head, tail) = raw_video_part_frame("video/mp4");
    let mut chunks: Vec<Result<Bytes, std::io::Error>> = vec![Ok(Bytes::from(head))];
    chunks.extend(payload.chunks(chunk_size).map(|c| Ok(Bytes::copy_from_slice(c))));
    chunks.push(Ok(Bytes::from(tail)));

    Request::builder()
        .method("POST")
        .uri(upload_path(video_id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", RAW_BOUNDARY),
        )
        .body(Body::from_stream(futures::stream::iter(chunks)))
        .expect("Failed to build request")
}
