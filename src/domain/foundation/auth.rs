//! Authentication domain types.
//!
//! Provider-agnostic identity for dashboard users. The `SessionValidator`
//! port maps validated token claims into an [`AuthenticatedUser`]; HTTP
//! handlers only ever see this type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BusinessId, UserId};

/// Role of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Business owner: full access to their tenant.
    Owner,
    /// Staff member: read/write knowledge, read analytics.
    Staff,
    /// Platform operator with access to every tenant.
    SuperAdmin,
}

impl Role {
    /// Parses a role claim, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "owner" => Some(Role::Owner),
            "staff" => Some(Role::Staff),
            "super_admin" | "superadmin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }
}

/// Authenticated dashboard user extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier (token subject).
    pub id: UserId,
    /// Tenant this user acts for.
    pub business_id: BusinessId,
    /// Role within the tenant.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, business_id: BusinessId, role: Role) -> Self {
        Self {
            id,
            business_id,
            role,
        }
    }

    /// Widget appearance and other tenant settings are owner-only.
    pub fn can_manage_settings(&self) -> bool {
        matches!(self.role, Role::Owner | Role::SuperAdmin)
    }
}

/// Authentication failures, independent of the token provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Missing claim: {0}")]
    MissingClaim(&'static str),

    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}
