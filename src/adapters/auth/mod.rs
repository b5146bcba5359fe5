//! Authentication adapters implementing the `SessionValidator` port.
//!
//! - `jwt` - HS256 dashboard tokens (production)
//! - `mock` - fixed token table for tests

mod jwt;
mod mock;

pub use jwt::{DashboardClaims, JwtSessionValidator};
pub use mock::MockSessionValidator;
