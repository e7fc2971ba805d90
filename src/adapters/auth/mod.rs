//! Token validation adapters.

mod jwt;
mod mock;

pub use jwt::{JwtConfig, JwtTokenValidator};
pub use mock::MockTokenValidator;
