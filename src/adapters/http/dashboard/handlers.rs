//! HTTP handlers for the dashboard endpoints.
//!
//! Every handler takes its tenant from the validated token; no business id
//! is ever read from the path or body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::analytics::DEFAULT_FUNNEL_DAYS;
use crate::application::{
    CreateKnowledgeCommand, DeleteKnowledgeCommand, EmbedCode, FunnelReport, GapReport,
    GetFunnelQuery, GetGuestJourneyQuery, GetKnowledgeGapsQuery, SearchKnowledgeQuery,
    UpdateKnowledgeCommand, UpdateWidgetConfigCommand,
};
use crate::domain::foundation::{ErrorCode, GuestId, KnowledgeItemId};
use crate::domain::journey::GuestJourney;
use crate::domain::knowledge::{KnowledgeItem, KnowledgeItemDraft};
use crate::domain::widget::WidgetConfig;

use super::dto::{
    FunnelParams, GapParams, KnowledgeListResponse, SearchParams, SearchResponse,
    WidgetConfigRequest,
};

fn parse_item_id(raw: &str) -> Result<KnowledgeItemId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid knowledge item ID format"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Knowledge base
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/dashboard/knowledge
pub async fn list_knowledge(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<KnowledgeListResponse>, ApiError> {
    let items = state.list_knowledge_handler().handle(user.business_id).await?;
    Ok(Json(items.into()))
}

/// POST /api/dashboard/knowledge
pub async fn create_knowledge(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<KnowledgeItemDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<KnowledgeItem>), ApiError> {
    let Json(draft) = body?;
    let item = state
        .create_knowledge_handler()
        .handle(CreateKnowledgeCommand {
            business_id: user.business_id,
            draft,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/dashboard/knowledge/:id
pub async fn update_knowledge(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<String>,
    body: Result<Json<KnowledgeItemDraft>, JsonRejection>,
) -> Result<Json<KnowledgeItem>, ApiError> {
    let item_id = parse_item_id(&item_id)?;
    let Json(draft) = body?;
    let item = state
        .update_knowledge_handler()
        .handle(UpdateKnowledgeCommand {
            business_id: user.business_id,
            item_id,
            draft,
        })
        .await?;
    Ok(Json(item))
}

/// DELETE /api/dashboard/knowledge/:id
pub async fn delete_knowledge(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(item_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let item_id = parse_item_id(&item_id)?;
    state
        .delete_knowledge_handler()
        .handle(DeleteKnowledgeCommand {
            business_id: user.business_id,
            item_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dashboard/knowledge/search?q=
pub async fn search_knowledge(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params?;
    let results = state
        .search_knowledge_handler()
        .handle(SearchKnowledgeQuery {
            business_id: user.business_id,
            query: params.q.clone(),
            limit: params.limit,
        })
        .await?;
    Ok(Json(SearchResponse {
        query: params.q,
        results,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Analytics
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/dashboard/analytics/funnel?days=30
pub async fn get_funnel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    params: Result<Query<FunnelParams>, QueryRejection>,
) -> Result<Json<FunnelReport>, ApiError> {
    let Query(params) = params?;
    let report = state
        .funnel_handler()
        .handle(GetFunnelQuery {
            business_id: user.business_id,
            days: params.days.unwrap_or(DEFAULT_FUNNEL_DAYS),
        })
        .await?;
    Ok(Json(report))
}

/// GET /api/dashboard/analytics/journeys/:guest_id
pub async fn get_guest_journey(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(guest_id): Path<String>,
) -> Result<Json<GuestJourney>, ApiError> {
    let guest_id = GuestId::new(guest_id)?;
    let journey = state
        .guest_journey_handler()
        .handle(GetGuestJourneyQuery {
            business_id: user.business_id,
            guest_id,
        })
        .await?;
    Ok(Json(journey))
}

/// GET /api/dashboard/analytics/knowledge-gaps
pub async fn get_knowledge_gaps(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    params: Result<Query<GapParams>, QueryRejection>,
) -> Result<Json<GapReport>, ApiError> {
    let Query(params) = params?;
    let report = state
        .knowledge_gaps_handler()
        .handle(GetKnowledgeGapsQuery {
            business_id: user.business_id,
            days: params.days,
            min_occurrences: params.min_occurrences,
        })
        .await?;
    Ok(Json(report))
}

// ════════════════════════════════════════════════════════════════════════════════
// Widget settings
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/dashboard/widget/embed-code
pub async fn get_embed_code(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<EmbedCode>, ApiError> {
    let embed = state.embed_code_handler().handle(user.business_id).await?;
    Ok(Json(embed))
}

/// PUT /api/dashboard/widget/config
pub async fn update_widget_config(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<WidgetConfigRequest>, JsonRejection>,
) -> Result<Json<WidgetConfig>, ApiError> {
    if !user.can_manage_settings() {
        return Err(ApiError::new(
            ErrorCode::Forbidden,
            "Only the business owner can change widget settings",
        ));
    }
    let Json(request) = body?;
    let config = state
        .update_widget_config_handler()
        .handle(UpdateWidgetConfigCommand {
            business_id: user.business_id,
            primary_color: request.primary_color,
            position: request.position,
            greeting: request.greeting,
            placeholder: request.placeholder,
            launcher_label: request.launcher_label,
            show_branding: request.show_branding,
        })
        .await?;
    Ok(Json(config))
}
