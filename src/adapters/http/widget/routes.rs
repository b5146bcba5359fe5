//! Routes for the public widget API.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::adapters::http::middleware::{chat_rate_limit_middleware, RateLimiterState};
use crate::adapters::http::state::AppState;

use super::handlers::{chat, get_widget_config, record_event};

/// Mounted under `/api/widget`. Only chat is rate limited.
pub fn widget_routes(state: AppState) -> Router {
    let limiter = RateLimiterState::new(state.limiter.clone())
        .with_trusted_proxies(state.widget.trusted_proxies_list());
    let chat_routes = Router::new()
        .route("/:business_id/chat", post(chat))
        .route_layer(middleware::from_fn_with_state(limiter, chat_rate_limit_middleware));

    Router::new()
        .route("/:business_id/config", get(get_widget_config))
        .route("/:business_id/events", post(record_event))
        .merge(chat_routes)
        .with_state(state)
}
