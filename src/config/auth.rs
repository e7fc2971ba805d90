//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (HS256 JWT validation)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// Shared secret used to verify token signatures
    pub jwt_secret: String,

    /// Expected token issuer, checked when set
    pub issuer: Option<String>,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 bytes; development
    /// only requires it to be present.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if *environment == Environment::Production && self.jwt_secret.len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        Ok(())
    }
}
