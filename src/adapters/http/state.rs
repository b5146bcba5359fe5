//! Shared application state for the HTTP surface.

use std::sync::Arc;

use crate::application::{
    ChatSettings, CreateKnowledgeHandler, DeleteKnowledgeHandler, GenerateResponseHandler,
    GetEmbedCodeHandler, GetFunnelHandler, GetGuestJourneyHandler, GetKnowledgeGapsHandler,
    GetWidgetConfigHandler, ListKnowledgeHandler, RecordEventHandler, SearchKnowledgeHandler,
    UpdateKnowledgeHandler, UpdateWidgetConfigHandler,
};
use crate::config::WidgetSettings;
use crate::ports::{
    AIProvider, BusinessRepository, ConversationRepository, KnowledgeRepository, RateLimiter,
    SessionValidator, TouchpointRepository,
};

/// Ports and settings every route handler is built from.
///
/// Application handlers are cheap to construct, so each request builds the
/// one it needs.
#[derive(Clone)]
pub struct AppState {
    pub businesses: Arc<dyn BusinessRepository>,
    pub knowledge: Arc<dyn KnowledgeRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub touchpoints: Arc<dyn TouchpointRepository>,
    /// None runs the service on fallback replies only.
    pub ai: Option<Arc<dyn AIProvider>>,
    pub sessions: Arc<dyn SessionValidator>,
    pub limiter: Arc<dyn RateLimiter>,
    pub chat: ChatSettings,
    pub widget: WidgetSettings,
}

impl AppState {
    pub fn generate_response_handler(&self) -> GenerateResponseHandler {
        GenerateResponseHandler::new(
            self.businesses.clone(),
            self.knowledge.clone(),
            self.conversations.clone(),
            self.touchpoints.clone(),
            self.ai.clone(),
        )
        .with_settings(self.chat.clone())
    }

    pub fn record_event_handler(&self) -> RecordEventHandler {
        RecordEventHandler::new(self.businesses.clone(), self.touchpoints.clone())
            .with_tracking(self.chat.journey_tracking)
    }

    pub fn widget_config_handler(&self) -> GetWidgetConfigHandler {
        GetWidgetConfigHandler::new(self.businesses.clone())
    }

    pub fn update_widget_config_handler(&self) -> UpdateWidgetConfigHandler {
        UpdateWidgetConfigHandler::new(self.businesses.clone())
    }

    pub fn embed_code_handler(&self) -> GetEmbedCodeHandler {
        GetEmbedCodeHandler::new(
            self.businesses.clone(),
            self.widget.script_url.clone(),
            self.widget.api_base_url.clone(),
        )
    }

    pub fn list_knowledge_handler(&self) -> ListKnowledgeHandler {
        ListKnowledgeHandler::new(self.knowledge.clone())
    }

    pub fn create_knowledge_handler(&self) -> CreateKnowledgeHandler {
        CreateKnowledgeHandler::new(self.knowledge.clone())
    }

    pub fn update_knowledge_handler(&self) -> UpdateKnowledgeHandler {
        UpdateKnowledgeHandler::new(self.knowledge.clone())
    }

    pub fn delete_knowledge_handler(&self) -> DeleteKnowledgeHandler {
        DeleteKnowledgeHandler::new(self.knowledge.clone())
    }

    pub fn search_knowledge_handler(&self) -> SearchKnowledgeHandler {
        SearchKnowledgeHandler::new(self.knowledge.clone())
    }

    pub fn funnel_handler(&self) -> GetFunnelHandler {
        GetFunnelHandler::new(self.businesses.clone(), self.touchpoints.clone())
    }

    pub fn guest_journey_handler(&self) -> GetGuestJourneyHandler {
        GetGuestJourneyHandler::new(self.businesses.clone(), self.touchpoints.clone())
    }

    pub fn knowledge_gaps_handler(&self) -> GetKnowledgeGapsHandler {
        GetKnowledgeGapsHandler::new(self.businesses.clone(), self.knowledge.clone())
            .with_enabled(self.chat.self_learning)
    }
}
