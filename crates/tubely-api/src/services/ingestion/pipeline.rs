//! The ingestion state machine.

use super::buffer::{multipart_error, stream_to_file, validate_video_content_type};
use super::types::{BufferedUpload, IngestionFailure, IngestionStage};
use crate::auth::CallerValidator;
use crate::error::{storage_error, transcode_error};
use axum::extract::Multipart;
use futures::TryStreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::Span;
use tubely_core::constants::{DEFAULT_VIDEO_EXTENSION, TEMP_UPLOAD_PREFIX, VIDEO_FORM_FIELD};
use tubely_core::{AppError, AspectCategory, Video};
use tubely_db::VideoRepository;
use tubely_processing::{processing_path, FastStartTranscoder, MediaProbe, TempArtifact};
use tubely_storage::{generate_video_key, Storage};
use uuid::Uuid;

/// Collaborators the pipeline drives.
pub struct IngestionDeps {
    pub auth: Arc<dyn CallerValidator>,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub probe: Arc<dyn MediaProbe>,
    pub transcoder: Arc<dyn FastStartTranscoder>,
}

#[derive(Debug, Clone)]
pub struct IngestionSettings {
    /// Directory for raw uploads and remux outputs.
    pub temp_dir: PathBuf,
    /// Upper bound on remuxes running at once across all requests.
    pub max_concurrent_transcodes: usize,
}

pub struct IngestionPipeline {
    auth: Arc<dyn CallerValidator>,
    videos: Arc<dyn VideoRepository>,
    storage: Arc<dyn Storage>,
    probe: Arc<dyn MediaProbe>,
    transcoder: Arc<dyn FastStartTranscoder>,
    transcode_permits: Arc<Semaphore>,
    temp_dir: PathBuf,
}

impl IngestionPipeline {
    pub fn new(deps: IngestionDeps, settings: IngestionSettings) -> Self {
        Self {
            auth: deps.auth,
            videos: deps.videos,
            storage: deps.storage,
            probe: deps.probe,
            transcoder: deps.transcoder,
            transcode_permits: Arc::new(Semaphore::new(settings.max_concurrent_transcodes.max(1))),
            temp_dir: settings.temp_dir,
        }
    }

    /// Run one upload through every stage.
    ///
    /// On success the returned record carries the public URL of the processed
    /// object. On failure the error names the last stage that completed. Both
    /// temp files are gone by the time this returns, whatever the outcome.
    pub async fn ingest(
        &self,
        video_id: Uuid,
        credential: &str,
        multipart: Multipart,
    ) -> Result<Video, IngestionFailure> {
        let started = Instant::now();
        let mut stage = IngestionStage::Received;
        match self.run(&mut stage, video_id, credential, multipart).await {
            Ok(video) => {
                tracing::info!(
                    video_id = %video_id,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Video ingestion finished"
                );
                Ok(video)
            }
            Err(cause) => {
                tracing::debug!(
                    video_id = %video_id,
                    stage = %stage,
                    error = %cause,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Video ingestion stopped"
                );
                Err(IngestionFailure { stage, cause })
            }
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(
            video_id = %video_id,
            user_id = tracing::field::Empty,
            category = tracing::field::Empty,
        )
    )]
    async fn run(
        &self,
        stage: &mut IngestionStage,
        video_id: Uuid,
        credential: &str,
        mut multipart: Multipart,
    ) -> Result<Video, AppError> {
        // Ownership is settled before a single body byte is read.
        let user_id = self.auth.validate_caller(credential).await?;
        Span::current().record("user_id", tracing::field::display(user_id));

        let mut video = self
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;
        if !video.is_owned_by(user_id) {
            return Err(AppError::Unauthorized(
                "Not authorized to update this video".to_string(),
            ));
        }
        *stage = IngestionStage::Authorized;

        let upload = self.buffer_upload(&mut multipart).await?;
        *stage = IngestionStage::Buffered;
        tracing::debug!(
            filename = %upload.filename,
            size_bytes = upload.size_bytes,
            "Upload buffered"
        );

        let category = self.classify(upload.artifact.path()).await;
        Span::current().record("category", category.prefix());
        *stage = IngestionStage::Probed;

        // Adopted before the tool runs so a partial output is removed too.
        let processed = TempArtifact::adopt(processing_path(upload.artifact.path()));
        self.fast_start(upload.artifact.path(), processed.path()).await?;
        *stage = IngestionStage::Transcoded;

        let key = generate_video_key(category, &upload.filename);
        let url = self
            .storage
            .put_file(key.as_str(), processed.path(), &upload.content_type)
            .await
            .map_err(storage_error)?;
        *stage = IngestionStage::Uploaded;

        video.set_video_url(url);
        if let Err(e) = self.videos.update_video(&video).await {
            tracing::error!(
                key = %key,
                error = %e,
                "Processed video stored but record update failed, object is orphaned"
            );
            return Err(e);
        }
        *stage = IngestionStage::Finalized;

        tracing::debug!(key = %key, category = %category, "Video record updated");
        Ok(video)
    }

    /// Stream the `video` part to a fresh temp file.
    ///
    /// Other parts are skipped. The content type is checked before anything
    /// touches the disk.
    async fn buffer_upload(&self, multipart: &mut Multipart) -> Result<BufferedUpload, AppError> {
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(VIDEO_FORM_FIELD) {
                continue;
            }

            let content_type = validate_video_content_type(field.content_type())?;
            let filename = field.file_name().unwrap_or_default().to_string();

            let (artifact, mut file) = TempArtifact::create_in(
                &self.temp_dir,
                TEMP_UPLOAD_PREFIX,
                DEFAULT_VIDEO_EXTENSION,
            )
            .map_err(|e| AppError::Internal(format!("Couldn't create temp file: {}", e)))?;

            let size_bytes = stream_to_file(&mut file, field.map_err(multipart_error)).await?;
            // Closed here; the tools reopen the file by path.
            drop(file);

            return Ok(BufferedUpload {
                artifact,
                filename,
                content_type,
                size_bytes,
            });
        }

        Err(AppError::BadRequest(format!(
            "Unable to parse form file: missing \"{}\" field",
            VIDEO_FORM_FIELD
        )))
    }

    /// A probe failure never fails the upload; the video lands under `other/`.
    async fn classify(&self, path: &Path) -> AspectCategory {
        match self.probe.probe(path).await {
            Ok(geometry) => {
                let category = geometry.aspect_category();
                tracing::debug!(
                    category = %category,
                    ratio = category.ratio_tag(),
                    "Video classified"
                );
                category
            }
            Err(e) => {
                tracing::warn!(error = %e, "Couldn't probe video, using fallback category");
                AspectCategory::Other
            }
        }
    }

    async fn fast_start(&self, source: &Path, output: &Path) -> Result<(), AppError> {
        let _permit = self
            .transcode_permits
            .acquire()
            .await
            .map_err(|e| AppError::Internal(format!("Transcode queue closed: {}", e)))?;
        self.transcoder
            .remux(source, output)
            .await
            .map_err(transcode_error)
    }
}
