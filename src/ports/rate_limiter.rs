//! Rate limiting port for the public widget surface.
//!
//! The widget is anonymous, so abuse is limited per client IP and per
//! business. Implementations use a fixed-window counter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{BusinessId, Timestamp};

/// Port for rate limiting operations.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if request is allowed, counting it if so.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;

    /// Get current status without counting a request.
    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError>;

    /// Clears the current window for a key.
    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError>;
}

/// The scope at which rate limiting is applied.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitScope {
    /// Per client IP address.
    Ip,
    /// Per tenant, across all of its guests.
    Business,
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitScope::Ip => "ip",
            RateLimitScope::Business => "business",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key identifying what to rate limit.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub scope: RateLimitScope,
    /// IP address or business id.
    pub identifier: String,
    /// Endpoint family, e.g. "chat".
    pub resource: String,
}

impl RateLimitKey {
    pub fn ip(ip: &str, resource: &str) -> Self {
        Self {
            scope: RateLimitScope::Ip,
            identifier: ip.to_string(),
            resource: resource.to_string(),
        }
    }

    pub fn business(business_id: BusinessId, resource: &str) -> Self {
        Self {
            scope: RateLimitScope::Business,
            identifier: business_id.to_string(),
            resource: resource.to_string(),
        }
    }

    /// Returns the Redis key string for this rate limit key.
    pub fn to_redis_key(&self) -> String {
        format!(
            "ratelimit:{}:{}:{}",
            self.scope.as_str(),
            self.identifier,
            self.resource
        )
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    Allowed(RateLimitStatus),
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }
}

/// Current rate limit status.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: Timestamp,
    pub window_secs: u32,
}

/// Details of a rate limit denial.
#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    pub limit: u32,
    /// Seconds until the client should retry.
    pub retry_after_secs: u32,
    pub scope: RateLimitScope,
    pub message: String,
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}
