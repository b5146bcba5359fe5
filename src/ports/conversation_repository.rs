//! Conversation repository port.

use async_trait::async_trait;

use crate::domain::conversation::{ChatMessage, Conversation};
use crate::domain::foundation::{BusinessId, ConversationId, DomainError, Timestamp};

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn find_by_id(&self, id: ConversationId) -> Result<Option<Conversation>, DomainError>;

    /// Insert or replace the conversation row (counters, guest details).
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError>;

    async fn append_message(&self, message: &ChatMessage) -> Result<(), DomainError>;

    /// Stores one guest/assistant exchange together with the conversation's
    /// new counters. The conversation row is written only after every message
    /// is stored, so a failed append never leaves counters ahead of messages.
    /// Adapters with transactions override this to make all writes atomic.
    async fn record_exchange(
        &self,
        conversation: &Conversation,
        messages: &[ChatMessage],
    ) -> Result<(), DomainError> {
        for message in messages {
            self.append_message(message).await?;
        }
        self.save(conversation).await
    }

    /// The last `limit` messages of a conversation, oldest first.
    async fn recent_messages(
        &self,
        id: ConversationId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, DomainError>;

    /// Guest messages sent to a business at or after `since`; drives quotas.
    async fn count_guest_messages_since(
        &self,
        business_id: BusinessId,
        since: Timestamp,
    ) -> Result<u32, DomainError>;
}
