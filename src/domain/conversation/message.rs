//! Chat message entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, KnowledgeItemId, MessageId, Timestamp, ValidationError};

/// Longest guest message accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2_000;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    Guest,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::Guest => "guest",
            MessageRole::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "guest" => Some(MessageRole::Guest),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

/// How an assistant reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Generated by the LLM.
    Ai,
    /// Verbatim answer of a strongly matching knowledge item.
    KnowledgeBase,
    /// Canned template.
    Fallback,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::Ai => "ai",
            ReplySource::KnowledgeBase => "knowledge_base",
            ReplySource::Fallback => "fallback",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ai" => Some(ReplySource::Ai),
            "knowledge_base" => Some(ReplySource::KnowledgeBase),
            "fallback" => Some(ReplySource::Fallback),
            _ => None,
        }
    }
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `content` is non-empty
/// - `source` is set only for assistant messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub role: MessageRole,
    pub content: String,
    pub source: Option<ReplySource>,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
    pub knowledge_item_ids: Vec<KnowledgeItemId>,
    pub created_at: Timestamp,
}

impl ChatMessage {
    /// Creates a guest message, enforcing the length limit.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if content is blank
    /// - `OutOfRange` if content exceeds [`MAX_MESSAGE_CHARS`]
    pub fn guest(conversation_id: ConversationId, content: &str) -> Result<Self, ValidationError> {
        let content = validate_guest_text(content)?;
        Ok(Self {
            id: MessageId::new(),
            conversation_id,
            role: MessageRole::Guest,
            content,
            source: None,
            model: None,
            tokens_used: None,
            knowledge_item_ids: Vec::new(),
            created_at: Timestamp::now(),
        })
    }

    /// Creates an assistant reply.
    pub fn assistant(
        conversation_id: ConversationId,
        content: impl Into<String>,
        source: ReplySource,
        model: Option<String>,
        tokens_used: Option<u32>,
        knowledge_item_ids: Vec<KnowledgeItemId>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self {
            id: MessageId::new(),
            conversation_id,
            role: MessageRole::Assistant,
            content,
            source: Some(source),
            model,
            tokens_used,
            knowledge_item_ids,
            created_at: Timestamp::now(),
        })
    }
}

/// Trims a guest message and checks it is non-empty and within the limit.
pub(crate) fn validate_guest_text(content: &str) -> Result<String, ValidationError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("message"));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(ValidationError::out_of_range(
            "message",
            1,
            MAX_MESSAGE_CHARS as i64,
            chars as i64,
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_message_is_trimmed() {
        let m = ChatMessage::guest(ConversationId::new(), "  hello there \n").unwrap();
        assert_eq!(m.content, "hello there");
        assert_eq!(m.role, MessageRole::Guest);
        assert!(m.source.is_none());
    }

    #[test]
    fn guest_message_rejects_blank() {
        let err = ChatMessage::guest(ConversationId::new(), "   ").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("message"));
    }

    #[test]
    fn guest_message_accepts_exact_limit() {
        let text = "x".repeat(MAX_MESSAGE_CHARS);
        assert!(ChatMessage::guest(ConversationId::new(), &text).is_ok());
    }

    #[test]
    fn guest_message_rejects_over_limit() {
        let text = "x".repeat(MAX_MESSAGE_CHARS + 1);
        let err = ChatMessage::guest(ConversationId::new(), &text).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { actual: 2001, .. }));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(ChatMessage::guest(ConversationId::new(), &text).is_ok());
    }

    #[test]
    fn assistant_message_carries_source() {
        let m = ChatMessage::assistant(
            ConversationId::new(),
            "We serve breakfast at 7.",
            ReplySource::KnowledgeBase,
            None,
            None,
            vec![KnowledgeItemId::new()],
        )
        .unwrap();
        assert_eq!(m.source, Some(ReplySource::KnowledgeBase));
        assert_eq!(m.knowledge_item_ids.len(), 1);
    }

    #[test]
    fn source_storage_names_roundtrip() {
        for s in [ReplySource::Ai, ReplySource::KnowledgeBase, ReplySource::Fallback] {
            assert_eq!(ReplySource::parse(s.as_str()), Some(s));
        }
        assert_eq!(MessageRole::parse("guest"), Some(MessageRole::Guest));
        assert_eq!(MessageRole::parse("system"), None);
    }
}
