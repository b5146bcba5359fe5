//! Dashboard HTTP adapter: knowledge base, analytics and widget settings.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::dashboard_routes;
