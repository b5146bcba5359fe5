//! GenerateResponseHandler - Command handler for guest chat messages.
//!
//! Validates the message, enforces the tier's monthly quota, resolves the
//! conversation, retrieves knowledge, asks the LLM (or the fallback
//! responder), persists both messages and then records usage, gaps and
//! journey touchpoints on a best-effort basis.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use super::ChatError;
use crate::config::{AiConfig, FeatureFlags};
use crate::domain::assistant::{FallbackResponder, GuestContext, PromptBuilder};
use crate::domain::business::BusinessProfile;
use crate::domain::conversation::{
    validate_guest_text, ChatMessage, Conversation, MessageRole, ReplySource,
};
use crate::domain::foundation::{
    BusinessId, ConversationId, GuestId, KnowledgeItemId, Timestamp,
};
use crate::domain::journey::Touchpoint;
use crate::domain::knowledge::{search_knowledge_base, KnowledgeMatch, SearchOptions, UnansweredQuestion};
use crate::domain::tier::{Tier, TierFeatures};
use crate::ports::{
    AIError, AIProvider, BusinessRepository, CompletionRequest, ConversationRepository,
    FinishReason, KnowledgeRepository, MessageRole as ProviderRole, RequestMetadata,
    TouchpointRepository,
};

/// Runtime switches for the reply pipeline.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub ai_responses: bool,
    pub journey_tracking: bool,
    pub self_learning: bool,
    tier_models: HashMap<Tier, String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            ai_responses: true,
            journey_tracking: true,
            self_learning: true,
            tier_models: HashMap::new(),
        }
    }
}

impl ChatSettings {
    pub fn from_config(ai: &AiConfig, flags: &FeatureFlags) -> Self {
        Self {
            ai_responses: flags.ai_responses,
            journey_tracking: flags.journey_tracking,
            self_learning: flags.self_learning,
            tier_models: Tier::ALL
                .iter()
                .map(|tier| (*tier, ai.features_for(*tier).model))
                .collect(),
        }
    }

    /// Tier features with any configured model override.
    pub fn features_for(&self, tier: Tier) -> TierFeatures {
        let features = TierFeatures::for_tier(tier);
        match self.tier_models.get(&tier) {
            Some(model) => features.with_model(model.clone()),
            None => features,
        }
    }
}

/// Command to answer one guest message.
#[derive(Debug, Clone)]
pub struct GenerateResponseCommand {
    pub business_id: BusinessId,
    pub message: String,
    pub conversation_id: Option<ConversationId>,
    pub guest_id: Option<GuestId>,
    pub guest_name: Option<String>,
    pub language: Option<String>,
    /// Correlates provider logs with the HTTP request.
    pub request_id: Option<String>,
}

impl GenerateResponseCommand {
    pub fn new(business_id: BusinessId, message: impl Into<String>) -> Self {
        Self {
            business_id,
            message: message.into(),
            conversation_id: None,
            guest_id: None,
            guest_name: None,
            language: None,
            request_id: None,
        }
    }

    pub fn in_conversation(mut self, conversation_id: ConversationId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }

    pub fn from_guest(mut self, guest_id: GuestId) -> Self {
        self.guest_id = Some(guest_id);
        self
    }
}

/// The reply sent back to the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResponseResult {
    pub reply: String,
    pub conversation_id: ConversationId,
    pub guest_id: GuestId,
    pub source: ReplySource,
    /// Set only for LLM replies.
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
    /// Every knowledge item the message matched, whatever produced the reply.
    pub knowledge_item_ids: Vec<KnowledgeItemId>,
}

struct Reply {
    text: String,
    source: ReplySource,
    model: Option<String>,
    tokens_used: Option<u32>,
}

/// Handler for guest chat messages.
pub struct GenerateResponseHandler {
    businesses: Arc<dyn BusinessRepository>,
    knowledge: Arc<dyn KnowledgeRepository>,
    conversations: Arc<dyn ConversationRepository>,
    touchpoints: Arc<dyn TouchpointRepository>,
    ai: Option<Arc<dyn AIProvider>>,
    settings: ChatSettings,
    prompts: PromptBuilder,
    fallback: FallbackResponder,
}

impl GenerateResponseHandler {
    pub fn new(
        businesses: Arc<dyn BusinessRepository>,
        knowledge: Arc<dyn KnowledgeRepository>,
        conversations: Arc<dyn ConversationRepository>,
        touchpoints: Arc<dyn TouchpointRepository>,
        ai: Option<Arc<dyn AIProvider>>,
    ) -> Self {
        Self {
            businesses,
            knowledge,
            conversations,
            touchpoints,
            ai,
            settings: ChatSettings::default(),
            prompts: PromptBuilder::new(),
            fallback: FallbackResponder::new(),
        }
    }

    pub fn with_settings(mut self, settings: ChatSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn handle(&self, cmd: GenerateResponseCommand) -> Result<GenerateResponseResult, ChatError> {
        // 1. Validate input
        let message = validate_guest_text(&cmd.message)?;

        // 2. Load the tenant
        let business = self
            .businesses
            .find_by_id(cmd.business_id)
            .await?
            .filter(|b| b.active)
            .ok_or(ChatError::BusinessNotFound(cmd.business_id))?;
        let features = self.settings.features_for(business.tier);

        // 3. Monthly quota. Counted before the exchange is stored, so
        // concurrent requests may overshoot the limit by the number in flight.
        if let Some(limit) = features.monthly_messages {
            let sent = self
                .conversations
                .count_guest_messages_since(business.id, Timestamp::now().start_of_month())
                .await?;
            if features.message_limit_reached(sent) {
                return Err(ChatError::QuotaExceeded { limit });
            }
        }

        // 4. Conversation
        let mut conversation = self.resolve_conversation(&cmd).await?;
        let guest_message = ChatMessage::guest(conversation.id(), &message)?;

        // 5. Knowledge retrieval
        let (matches, knowledge_loaded) = match self.knowledge.list_active(business.id).await {
            Ok(items) => (
                search_knowledge_base(
                    &items,
                    &message,
                    SearchOptions::with_limit(features.kb_items_in_prompt),
                ),
                true,
            ),
            Err(e) => {
                warn!(business_id = %business.id, error = %e, "Knowledge base unavailable, replying without it");
                (Vec::new(), false)
            }
        };

        // 6. Reply
        let request_id = cmd
            .request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let reply = self
            .compose_reply(&business, &features, &conversation, &message, &matches, request_id)
            .await;

        // 7. Persist
        let knowledge_item_ids: Vec<KnowledgeItemId> = matches.iter().map(|m| m.item.id).collect();
        let assistant_message = ChatMessage::assistant(
            conversation.id(),
            reply.text.clone(),
            reply.source,
            reply.model.clone(),
            reply.tokens_used,
            knowledge_item_ids.clone(),
        )?;
        let now = Timestamp::now();
        conversation.touch(2, now);
        self.conversations
            .record_exchange(&conversation, &[guest_message, assistant_message])
            .await?;

        // 8. Best-effort side effects
        let unanswered = knowledge_loaded && matches.is_empty();
        self.record_side_effects(
            business.id,
            conversation.guest_id(),
            &message,
            &knowledge_item_ids,
            unanswered,
            now,
        )
        .await;

        Ok(GenerateResponseResult {
            reply: reply.text,
            conversation_id: conversation.id(),
            guest_id: conversation.guest_id().clone(),
            source: reply.source,
            model: reply.model,
            tokens_used: reply.tokens_used,
            knowledge_item_ids,
        })
    }

    async fn resolve_conversation(&self, cmd: &GenerateResponseCommand) -> Result<Conversation, ChatError> {
        match cmd.conversation_id {
            Some(id) => {
                let mut conversation = self
                    .conversations
                    .find_by_id(id)
                    .await?
                    .filter(|c| c.belongs_to(cmd.business_id))
                    .ok_or(ChatError::ConversationNotFound(id))?;
                conversation.update_guest(cmd.guest_name.clone(), cmd.language.clone());
                Ok(conversation)
            }
            None => Ok(Conversation::start(
                cmd.business_id,
                cmd.guest_id.clone().unwrap_or_else(GuestId::anonymous),
                cmd.guest_name.clone(),
                cmd.language.clone(),
            )),
        }
    }

    async fn compose_reply(
        &self,
        business: &BusinessProfile,
        features: &TierFeatures,
        conversation: &Conversation,
        message: &str,
        matches: &[KnowledgeMatch],
        request_id: String,
    ) -> Reply {
        if self.settings.ai_responses {
            if let Some(ai) = &self.ai {
                match self
                    .ask_ai(ai.as_ref(), business, features, conversation, message, matches, request_id)
                    .await
                {
                    Ok(reply) => return reply,
                    Err(e) => warn!(
                        business_id = %business.id,
                        provider = %ai.provider_info().name,
                        error = %e,
                        "AI provider failed, using fallback reply"
                    ),
                }
            }
        }

        let fallback = self.fallback.respond(business, features.tier, message, matches);
        debug!(
            business_id = %business.id,
            intent = ?fallback.intent,
            answered_by = ?fallback.knowledge_item_ids,
            "Fallback reply"
        );
        Reply {
            text: fallback.text,
            source: fallback.source,
            model: None,
            tokens_used: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn ask_ai(
        &self,
        ai: &dyn AIProvider,
        business: &BusinessProfile,
        features: &TierFeatures,
        conversation: &Conversation,
        message: &str,
        matches: &[KnowledgeMatch],
        request_id: String,
    ) -> Result<Reply, AIError> {
        let guest = GuestContext {
            name: conversation.guest_name().map(str::to_string),
            language: conversation.language().map(str::to_string),
        };
        let system_prompt = self.prompts.build(business, features, matches, &guest);

        let history = if features.history_messages > 0 {
            self.conversations
                .recent_messages(conversation.id(), features.history_messages)
                .await
                .unwrap_or_else(|e| {
                    warn!(conversation_id = %conversation.id(), error = %e, "History unavailable");
                    Vec::new()
                })
        } else {
            Vec::new()
        };

        let mut request = CompletionRequest::new(RequestMetadata::new(
            business.id,
            conversation.id(),
            request_id,
        ))
        .with_system_prompt(system_prompt)
        .with_max_tokens(features.max_tokens)
        .with_temperature(features.temperature)
        .with_model(features.model.clone());
        for past in history {
            request = request.with_message(provider_role(past.role), past.content);
        }
        request = request.with_message(ProviderRole::User, message);

        let response = ai.complete(request).await?;
        let text = response.content.trim();
        if text.is_empty() {
            return Err(AIError::Parse("empty completion".to_string()));
        }
        if response.finish_reason == FinishReason::Length {
            debug!(business_id = %business.id, "Reply truncated at max_tokens");
        }

        Ok(Reply {
            text: text.to_string(),
            source: ReplySource::Ai,
            model: Some(response.model),
            tokens_used: Some(response.usage.total_tokens),
        })
    }

    async fn record_side_effects(
        &self,
        business_id: BusinessId,
        guest_id: &GuestId,
        message: &str,
        used: &[KnowledgeItemId],
        unanswered: bool,
        at: Timestamp,
    ) {
        if !used.is_empty() {
            if let Err(e) = self.knowledge.record_usage(business_id, used, at).await {
                warn!(business_id = %business_id, error = %e, "Failed to record knowledge usage");
            }
        }

        if unanswered && self.settings.self_learning {
            let question = UnansweredQuestion::new(business_id, Some(guest_id.clone()), message);
            if let Err(e) = self.knowledge.record_unanswered(&question).await {
                warn!(business_id = %business_id, error = %e, "Failed to record unanswered question");
            }
        }

        if self.settings.journey_tracking {
            let touchpoint = Touchpoint::message(business_id, guest_id.clone(), message, at);
            if let Err(e) = self.touchpoints.record(&touchpoint).await {
                warn!(business_id = %business_id, error = %e, "Failed to record touchpoint");
            }
        }
    }
}

fn provider_role(role: MessageRole) -> ProviderRole {
    match role {
        MessageRole::Guest => ProviderRole::User,
        MessageRole::Assistant => ProviderRole::Assistant,
    }
}
