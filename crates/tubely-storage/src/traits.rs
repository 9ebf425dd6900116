//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object-store collaborator for processed videos.
///
/// Backends stream the file from disk rather than loading it into memory, and
/// report the public location of the stored object in their own address scheme.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload the file at `path` under `key` with the given content type.
    /// Returns the public URL of the stored object.
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> StorageResult<String>;

    /// Public URL for `key` in this backend's address scheme.
    fn object_url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
