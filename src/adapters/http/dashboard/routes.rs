//! Routes for the authenticated dashboard API.

use axum::middleware;
use axum::routing::{get, put};
use axum::Router;

use crate::adapters::http::middleware::auth_middleware;
use crate::adapters::http::state::AppState;

use super::handlers::{
    create_knowledge, delete_knowledge, get_embed_code, get_funnel, get_guest_journey,
    get_knowledge_gaps, list_knowledge, search_knowledge, update_knowledge, update_widget_config,
};

/// Mounted under `/api/dashboard`, behind the Bearer token middleware.
pub fn dashboard_routes(state: AppState) -> Router {
    Router::new()
        .route("/knowledge", get(list_knowledge).post(create_knowledge))
        .route("/knowledge/search", get(search_knowledge))
        .route("/knowledge/:id", put(update_knowledge).delete(delete_knowledge))
        .route("/analytics/funnel", get(get_funnel))
        .route("/analytics/journeys/:guest_id", get(get_guest_journey))
        .route("/analytics/knowledge-gaps", get(get_knowledge_gaps))
        .route("/widget/embed-code", get(get_embed_code))
        .route("/widget/config", put(update_widget_config))
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
