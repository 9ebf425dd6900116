//! Application services

pub mod ingestion;
