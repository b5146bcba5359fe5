//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Anthropic and OpenAI completion clients, failover, mock
//! - `auth` - Dashboard token validation (JWT, mock)
//! - `http` - Axum routes for the widget and the dashboard
//! - `memory` - In-memory repositories for tests and database-less runs
//! - `postgres` - PostgreSQL repositories
//! - `rate_limiter` - Fixed-window limiters (in-memory, Redis)

pub mod ai;
pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod rate_limiter;
