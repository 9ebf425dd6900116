//! Tubely Storage Library
//!
//! Object-store abstraction for processed videos, with S3 and local filesystem
//! backends.
//!
//! # Storage key format
//!
//! `{category}/{token}{extension}`, where `category` is the aspect-ratio prefix
//! (`landscape`, `portrait` or `other`) and `token` is 64 hex characters drawn
//! from a cryptographically secure RNG. See the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_video_key, StorageKey};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
