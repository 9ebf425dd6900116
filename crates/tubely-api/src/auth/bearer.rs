use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeaderFormat)?;

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .ok_or(AuthError::InvalidHeaderFormat)?;

    if token.is_empty() {
        return Err(AuthError::InvalidHeaderFormat);
    }
    Ok(token)
}
