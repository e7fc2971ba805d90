//! Authentication types for the domain layer.
//!
//! These types represent an authenticated user extracted from a validated
//! token. They have no provider dependencies - any identity provider can
//! populate them via the `TokenValidator` port.

use super::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role assigned by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Organizer,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

/// Authenticated user extracted from a validated token.
///
/// This is a domain type with no provider dependencies. It is produced by
/// the `TokenValidator` adapter and injected into request extensions by
/// the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// User's email address from the token claims.
    pub email: String,

    /// Display name if available.
    pub name: Option<String>,

    /// Role claim.
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>, name: Option<String>, role: UserRole) -> Self {
        Self {
            id,
            email: email.into(),
            name,
            role,
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn name_or_email(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the user no longer exists in the system.
    #[error("User not found")]
    UserNotFound,

    /// The identity provider could not be reached.
    #[error("Authentication service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-1").unwrap(),
            "alice@example.com",
            Some("Alice".to_string()),
            UserRole::User,
        )
    }

    #[test]
    fn name_or_email_prefers_name() {
        assert_eq!(user().name_or_email(), "Alice");
    }

    #[test]
    fn name_or_email_falls_back_to_email() {
        let mut u = user();
        u.name = None;
        assert_eq!(u.name_or_email(), "alice@example.com");
    }

    #[test]
    fn role_serializes_uppercase() {
        let json = serde_json::to_string(&UserRole::Organizer).unwrap();
        assert_eq!(json, "\"ORGANIZER\"");
    }
}
