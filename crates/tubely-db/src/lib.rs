//! Tubely database layer
//!
//! Repository traits are the seam the API depends on; the PostgreSQL
//! implementations live next to them.

pub mod db;

pub use db::{PgVideoRepository, VideoRepository};
