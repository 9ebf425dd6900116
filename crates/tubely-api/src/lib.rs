//! Tubely API Library
//!
//! HTTP surface, bearer authentication, the video ingestion pipeline and
//! application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
pub mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod services;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::ingestion::{IngestionFailure, IngestionPipeline, IngestionStage};
pub use state::AppState;
