//! Session validation port for dashboard access tokens.
//!
//! Implementations must validate signature, issuer and expiry, and map the
//! claims to an [`AuthenticatedUser`] scoped to one business.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed or badly signed tokens
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::MissingClaim` when a required claim is absent
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
