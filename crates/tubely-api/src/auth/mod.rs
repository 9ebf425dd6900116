//! Caller authentication
//!
//! The ingestion pipeline only needs "who is calling": a [`CallerValidator`]
//! turns a bearer credential into a user ID. [`JwtValidator`] is the HS256
//! implementation used in production.

pub mod bearer;
pub mod jwt;

use async_trait::async_trait;
use thiserror::Error;
use tubely_core::AppError;
use uuid::Uuid;

pub use bearer::extract_bearer_token;
pub use jwt::{JwtClaims, JwtValidator};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Invalid authorization header format")]
    InvalidHeaderFormat,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingHeader | AuthError::InvalidHeaderFormat => {
                AppError::Unauthorized("Couldn't find JWT".to_string())
            }
            AuthError::InvalidToken(_) => {
                AppError::Unauthorized("Couldn't validate JWT".to_string())
            }
        }
    }
}

/// Resolves a bearer credential to the calling user's ID.
#[async_trait]
pub trait CallerValidator: Send + Sync {
    async fn validate_caller(&self, token: &str) -> Result<Uuid, AuthError>;
}
