//! Service wiring

use crate::auth::JwtValidator;
use crate::services::ingestion::{IngestionDeps, IngestionPipeline, IngestionSettings};
use crate::state::AppState;
use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_processing::{FfmpegFastStart, FfprobeProbe};
use tubely_storage::Storage;

/// Build the repositories, media tools and ingestion pipeline.
pub async fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    tokio::fs::create_dir_all(config.upload_temp_dir())
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp dir {}",
                config.upload_temp_dir().display()
            )
        })?;

    let videos = Arc::new(PgVideoRepository::new(pool));
    let probe = FfprobeProbe::new(config.ffprobe_path()).context("Invalid FFPROBE_PATH")?;
    let transcoder = FfmpegFastStart::new(config.ffmpeg_path()).context("Invalid FFMPEG_PATH")?;

    let pipeline = IngestionPipeline::new(
        IngestionDeps {
            auth: Arc::new(JwtValidator::new(config.jwt_secret(), config.jwt_issuer())),
            videos: videos.clone(),
            storage,
            probe: Arc::new(probe),
            transcoder: Arc::new(transcoder),
        },
        IngestionSettings {
            temp_dir: config.upload_temp_dir().to_path_buf(),
            max_concurrent_transcodes: config.max_concurrent_transcodes(),
        },
    );

    tracing::info!(
        ffmpeg_path = %config.ffmpeg_path(),
        ffprobe_path = %config.ffprobe_path(),
        max_concurrent_transcodes = config.max_concurrent_transcodes(),
        temp_dir = %config.upload_temp_dir().display(),
        "Ingestion pipeline initialized"
    );

    Ok(Arc::new(AppState {
        ingestion: Arc::new(pipeline),
        videos,
        environment: config.environment().to_string(),
    }))
}
