use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use tubely_api::auth::JwtClaims;
use uuid::Uuid;

/// Shared secret the test validator is built with.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_ISSUER: &str = "tubely-access";

fn sign(claims: &JwtClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign token")
}

/// A valid access token for `user_id`.
pub fn issue_token(user_id: Uuid) -> String {
    let now = Utc::now();
    sign(
        &JwtClaims {
            sub: user_id,
            iss: TEST_ISSUER.to_string(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        },
        TEST_JWT_SECRET,
    )
}

pub fn expired_token(user_id: Uuid) -> String {
    let now = Utc::now();
    sign(
        &JwtClaims {
            sub: user_id,
            iss: TEST_ISSUER.to_string(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        },
        TEST_JWT_SECRET,
    )
}

pub fn token_signed_with(user_id: Uuid, secret: &str) -> String {
    let now = Utc::now();
    sign(
        &JwtClaims {
            sub: user_id,
            iss: TEST_ISSUER.to_string(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        },
        secret,
    )
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
