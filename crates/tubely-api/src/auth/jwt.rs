//! HS256 access-token validation

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthError, CallerValidator};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user_id
    pub iss: String,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

/// Validates access tokens signed with the shared secret.
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl CallerValidator for JwtValidator {
    async fn validate_caller(&self, token: &str) -> Result<Uuid, AuthError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                AuthError::InvalidToken(e.to_string())
            })?;
        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit-test-secret-that-is-at-least-32-chars";

    fn token(sub: Uuid, issuer: &str, expires_in: Duration, secret: &str) -> String {
        let now = Utc::now();
        let claims = JwtClaims {
            sub,
            iss: issuer.to_string(),
            exp: (now + expires_in).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_yields_subject() {
        let validator = JwtValidator::new(SECRET, "tubely-access");
        let user_id = Uuid::new_v4();
        let jwt = token(user_id, "tubely-access", Duration::hours(1), SECRET);
        assert_eq!(validator.validate_caller(&jwt).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let validator = JwtValidator::new(SECRET, "tubely-access");
        let jwt = token(Uuid::new_v4(), "tubely-access", Duration::hours(-1), SECRET);
        assert!(matches!(
            validator.validate_caller(&jwt).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_issuer_or_secret_rejected() {
        let validator = JwtValidator::new(SECRET, "tubely-access");
        let wrong_issuer = token(Uuid::new_v4(), "someone-else", Duration::hours(1), SECRET);
        assert!(validator.validate_caller(&wrong_issuer).await.is_err());

        let wrong_secret = token(
            Uuid::new_v4(),
            "tubely-access",
            Duration::hours(1),
            "another-secret-that-is-also-32-chars-long",
        );
        assert!(validator.validate_caller(&wrong_secret).await.is_err());
        assert!(validator.validate_caller("not-a-jwt").await.is_err());
    }
}
