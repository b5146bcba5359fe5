//! AI Provider Port - Interface for LLM completion backends.
//!
//! The chat handler builds one [`CompletionRequest`] per guest message
//! (system prompt + trimmed history + the new question) and asks whichever
//! provider is wired in for a reply. Requests may carry a model override,
//! which is how tier-specific model selection reaches the wire.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BusinessId, ConversationId};

/// Port for LLM completion.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single, non-streaming completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Rough token count for `text`, used to keep history inside the window.
    fn estimate_tokens(&self, text: &str) -> u32 {
        // ~4 characters per token for English prose
        (text.chars().count() as u32).div_ceil(4)
    }

    /// Name, default model and context window of the backend.
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Conversation history ending with the current guest message.
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Model override; None uses the provider's configured default.
    pub model: Option<String>,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            model: None,
            metadata,
        }
    }

    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message::new(role, content));
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Requests a specific model instead of the provider default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Model to send on the wire: the override if set, else `default`.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.model.as_deref().unwrap_or(default)
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Role of the message sender, as the providers name it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Tenant and conversation the call is made for; logged by adapters.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub business_id: BusinessId,
    pub conversation_id: ConversationId,
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(
        business_id: BusinessId,
        conversation_id: ConversationId,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            business_id,
            conversation_id,
            trace_id: trace_id.into(),
        }
    }
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
    /// Model that actually produced the reply.
    pub model: String,
    pub finish_reason: FinishReason,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    /// Hit max_tokens; the reply may be cut mid-sentence.
    Length,
    ContentFilter,
}

/// Provider information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// "anthropic", "openai", "mock"...
    pub name: String,
    /// Default model when the request carries no override.
    pub model: String,
    pub max_context_tokens: u32,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>, max_context_tokens: u32) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            max_context_tokens,
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("content filtered: {0}")]
    ContentFiltered(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no AI provider configured")]
    NotConfigured,

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl AIError {
    /// Returns true if the same request may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable(_)
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> RequestMetadata {
        RequestMetadata::new(BusinessId::new(), ConversationId::new(), "trace-123")
    }

    #[test]
    fn completion_request_builder_works() {
        let request = CompletionRequest::new(metadata())
            .with_message(MessageRole::User, "Do you have parking?")
            .with_system_prompt("You are the virtual concierge")
            .with_max_tokens(300)
            .with_temperature(0.3)
            .with_model("claude-3-haiku-20240307");

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.max_tokens, Some(300));
        assert_eq!(request.model_or("default"), "claude-3-haiku-20240307");
    }

    #[test]
    fn model_or_falls_back_to_default() {
        let request = CompletionRequest::new(metadata());
        assert_eq!(request.model_or("gpt-4o-mini"), "gpt-4o-mini");
    }

    #[test]
    fn token_usage_calculates_total() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn retryable_classification() {
        assert!(AIError::RateLimited { retry_after_secs: 30 }.is_retryable());
        assert!(AIError::Unavailable("down".into()).is_retryable());
        assert!(AIError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(!AIError::AuthenticationFailed.is_retryable());
        assert!(!AIError::ContentFiltered("unsafe".into()).is_retryable());
        assert!(!AIError::NotConfigured.is_retryable());
    }

    #[test]
    fn message_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn ai_error_displays_correctly() {
        assert_eq!(
            AIError::RateLimited { retry_after_secs: 30 }.to_string(),
            "rate limited: retry after 30s"
        );
        assert_eq!(AIError::NotConfigured.to_string(), "no AI provider configured");
    }
}
