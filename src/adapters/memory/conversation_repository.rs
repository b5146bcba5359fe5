use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{ChatMessage, Conversation, MessageRole};
use crate::domain::foundation::{BusinessId, ConversationId, DomainError, Timestamp};
use crate::ports::ConversationRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationRepository {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
    messages: Arc<RwLock<Vec<ChatMessage>>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages of a conversation, oldest first.
    pub async fn messages_for(&self, id: ConversationId) -> Vec<ChatMessage> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|m| m.conversation_id == id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find_by_id(&self, id: ConversationId) -> Result<Option<Conversation>, DomainError> {
        Ok(self.conversations.read().await.get(&id).cloned())
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        self.conversations
            .write()
            .await
            .insert(conversation.id(), conversation.clone());
        Ok(())
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<(), DomainError> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn recent_messages(
        &self,
        id: ConversationId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let all = self.messages_for(id).await;
        let skip = all.len().saturating_sub(limit);
        Ok(all.into_iter().skip(skip).collect())
    }

    async fn count_guest_messages_since(
        &self,
        business_id: BusinessId,
        since: Timestamp,
    ) -> Result<u32, DomainError> {
        let conversations = self.conversations.read().await;
        let count = self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.role == MessageRole::Guest && !m.created_at.is_before(&since))
            .filter(|m| {
                conversations
                    .get(&m.conversation_id)
                    .is_some_and(|c| c.belongs_to(business_id))
            })
            .count();
        Ok(count as u32)
    }
}
