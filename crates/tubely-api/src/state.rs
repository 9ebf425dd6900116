//! Application state shared by handlers.

use crate::services::ingestion::IngestionPipeline;
use std::sync::Arc;
use tubely_db::VideoRepository;

/// Everything a request handler can reach. Collaborators are trait objects
/// so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    pub ingestion: Arc<IngestionPipeline>,
    pub videos: Arc<dyn VideoRepository>,
    pub environment: String,
}
