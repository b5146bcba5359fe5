//! Request and response bodies of the public widget API.

use serde::{Deserialize, Serialize};

use crate::application::{GenerateResponseResult, RecordEventResult};
use crate::domain::conversation::ReplySource;
use crate::domain::foundation::KnowledgeItemId;
use crate::domain::journey::FunnelStage;

/// POST /api/widget/:business_id/chat
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Omit to start a new conversation.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Stored by the widget after the first reply.
    #[serde(default)]
    pub guest_id: Option<String>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub conversation_id: String,
    pub guest_id: String,
    pub source: ReplySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub knowledge_item_ids: Vec<KnowledgeItemId>,
}

impl From<GenerateResponseResult> for ChatResponse {
    fn from(result: GenerateResponseResult) -> Self {
        Self {
            reply: result.reply,
            conversation_id: result.conversation_id.to_string(),
            guest_id: result.guest_id.as_str().to_string(),
            source: result.source,
            model: result.model,
            knowledge_item_ids: result.knowledge_item_ids,
        }
    }
}

/// POST /api/widget/:business_id/events
#[derive(Debug, Clone, Deserialize)]
pub struct EventRequest {
    /// e.g. `viewed_rooms`, `clicked_book_now`.
    pub event: String,
    #[serde(default)]
    pub guest_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub guest_id: String,
    pub stage: FunnelStage,
    pub recorded: bool,
}

impl From<RecordEventResult> for EventResponse {
    fn from(result: RecordEventResult) -> Self {
        Self {
            guest_id: result.guest_id.as_str().to_string(),
            stage: result.stage,
            recorded: result.recorded,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
