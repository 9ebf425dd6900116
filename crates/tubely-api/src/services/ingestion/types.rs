use crate::error::HttpAppError;
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;
use tubely_core::AppError;
use tubely_processing::TempArtifact;

/// Progress of a single upload through the pipeline. Stages run strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionStage {
    Received,
    Authorized,
    Buffered,
    Probed,
    Transcoded,
    Uploaded,
    Finalized,
}

impl Display for IngestionStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            IngestionStage::Received => "received",
            IngestionStage::Authorized => "authorized",
            IngestionStage::Buffered => "buffered",
            IngestionStage::Probed => "probed",
            IngestionStage::Transcoded => "transcoded",
            IngestionStage::Uploaded => "uploaded",
            IngestionStage::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Terminal failure: the last stage reached and what went wrong leaving it.
#[derive(Debug, Error)]
#[error("video ingestion failed after stage {stage}: {cause}")]
pub struct IngestionFailure {
    pub stage: IngestionStage,
    #[source]
    pub cause: AppError,
}

impl From<IngestionFailure> for HttpAppError {
    fn from(failure: IngestionFailure) -> Self {
        HttpAppError(failure.cause)
    }
}

/// The raw upload staged on disk.
pub(crate) struct BufferedUpload {
    pub artifact: TempArtifact,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
}
