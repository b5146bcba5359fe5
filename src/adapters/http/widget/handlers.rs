//! HTTP handlers for the public widget endpoints.
//!
//! No authentication: the business id in the path is the only scope, and
//! inactive businesses answer 404.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::{GenerateResponseCommand, RecordEventCommand};
use crate::domain::foundation::{BusinessId, ConversationId, GuestId};
use crate::domain::widget::WidgetConfig;

use super::dto::{ChatRequest, ChatResponse, EventRequest, EventResponse};

pub(crate) fn parse_business_id(raw: &str) -> Result<BusinessId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid business ID format"))
}

fn parse_guest_id(raw: Option<String>) -> Result<Option<GuestId>, ApiError> {
    raw.filter(|g| !g.trim().is_empty())
        .map(GuestId::new)
        .transpose()
        .map_err(ApiError::from)
}

/// GET /api/widget/:business_id/config
pub async fn get_widget_config(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> Result<Json<WidgetConfig>, ApiError> {
    let business_id = parse_business_id(&business_id)?;
    let config = state.widget_config_handler().handle(business_id).await?;
    Ok(Json(config))
}

/// POST /api/widget/:business_id/chat
pub async fn chat(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let business_id = parse_business_id(&business_id)?;
    let Json(request) = body?;

    let mut cmd = GenerateResponseCommand::new(business_id, request.message);
    if let Some(raw) = request.conversation_id.filter(|c| !c.trim().is_empty()) {
        let conversation_id: ConversationId = raw
            .parse()
            .map_err(|_| ApiError::bad_request("Invalid conversation ID format"))?;
        cmd = cmd.in_conversation(conversation_id);
    }
    if let Some(guest_id) = parse_guest_id(request.guest_id)? {
        cmd = cmd.from_guest(guest_id);
    }
    cmd.guest_name = request.guest_name;
    cmd.language = request.language;
    cmd.request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let result = state.generate_response_handler().handle(cmd).await?;
    Ok(Json(result.into()))
}

/// POST /api/widget/:business_id/events
pub async fn record_event(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let business_id = parse_business_id(&business_id)?;
    let Json(request) = body?;

    let result = state
        .record_event_handler()
        .handle(RecordEventCommand {
            business_id,
            guest_id: parse_guest_id(request.guest_id)?,
            event: request.event,
        })
        .await?;

    Ok((StatusCode::ACCEPTED, Json(result.into())))
}
