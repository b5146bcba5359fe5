//! HTTP middleware for axum.
//!
//! - `auth` - Dashboard token validation and the `RequireAuth` extractor
//! - `rate_limit` - Per-IP and per-business limits on widget chat

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, AuthState, RequireAuth};
pub use rate_limit::{chat_rate_limit_middleware, RateLimiterState, CHAT_RESOURCE};
