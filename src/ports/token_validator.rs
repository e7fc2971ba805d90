//! TokenValidator port - identity verification at the system boundary.
//!
//! Identity issuance is external; this port only turns a presented token
//! into an `AuthenticatedUser` or an `AuthError`.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Port for validating bearer tokens.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validates a token and returns the authenticated user.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
