//! HTTP adapters - REST API implementations.
//!
//! - `widget` - public endpoints called by the embedded chat widget
//! - `dashboard` - Bearer-authenticated tenant management endpoints
//! - `middleware` - auth and rate limiting
//! - `error` - `ApiError` and the JSON error body

pub mod dashboard;
pub mod error;
pub mod middleware;
pub mod router;
pub mod state;
pub mod widget;

pub use error::{expose_internal_errors, ApiError, ErrorBody};
pub use router::build_router;
pub use state::AppState;
