//! JWT adapter for token validation.
//!
//! Implements the `TokenValidator` port with `jsonwebtoken` over a shared
//! HS256 secret. Validates signature and expiry, plus issuer when
//! configured, then maps claims to the domain `AuthenticatedUser` type.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId, UserRole};
use crate::ports::TokenValidator;

/// Configuration for the JWT validator.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 signing secret.
    pub secret: String,

    /// Expected issuer claim. Skipped when `None`.
    pub issuer: Option<String>,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// JWT claims carried by our access tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject - the user ID.
    sub: String,

    /// Expiry timestamp (Unix epoch seconds).
    exp: i64,

    /// Issuer URL.
    #[serde(default)]
    iss: Option<String>,

    /// User's email address.
    email: String,

    /// User's display name.
    #[serde(default)]
    name: Option<String>,

    /// Role claim, defaults to USER when absent.
    #[serde(default)]
    role: Option<UserRole>,
}

/// `TokenValidator` backed by a shared-secret JWT.
pub struct JwtTokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenValidator {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenValidator for JwtTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        let claims = data.claims;
        let id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(
            id,
            claims.email,
            claims.name,
            claims.role.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(exp_offset_secs: i64) -> Claims {
        Claims {
            sub: "user-123".to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset_secs,
            iss: None,
            email: "alice@example.com".to_string(),
            name: Some("Alice".to_string()),
            role: Some(UserRole::Organizer),
        }
    }

    #[tokio::test]
    async fn valid_token_maps_claims() {
        let validator = JwtTokenValidator::new(&JwtConfig::new(SECRET));
        let user = validator.validate(&token(&claims(3600), SECRET)).await.unwrap();

        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, UserRole::Organizer);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_specifically() {
        let validator = JwtTokenValidator::new(&JwtConfig::new(SECRET));
        let result = validator.validate(&token(&claims(-3600), SECRET)).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let validator = JwtTokenValidator::new(&JwtConfig::new(SECRET));
        let result = validator
            .validate(&token(&claims(3600), "other-secret"))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn missing_role_defaults_to_user() {
        let validator = JwtTokenValidator::new(&JwtConfig::new(SECRET));
        let mut c = claims(3600);
        c.role = None;
        let user = validator.validate(&token(&c, SECRET)).await.unwrap();
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn issuer_mismatch_is_invalid() {
        let validator =
            JwtTokenValidator::new(&JwtConfig::new(SECRET).with_issuer("https://auth.seatcal.dev"));
        let mut c = claims(3600);
        c.iss = Some("https://evil.example.com".to_string());
        let result = validator.validate(&token(&c, SECRET)).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let validator = JwtTokenValidator::new(&JwtConfig::new(SECRET));
        let result = validator.validate("not-a-jwt").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
