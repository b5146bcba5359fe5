//! Public widget HTTP adapter: config, chat and journey events.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ChatRequest, ChatResponse, EventRequest, EventResponse, HealthResponse};
pub use routes::widget_routes;
