//! PostgreSQL implementation of ConversationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{corrupt, db_error};
use crate::domain::conversation::{ChatMessage, Conversation, MessageRole, ReplySource};
use crate::domain::foundation::{
    BusinessId, ConversationId, DomainError, GuestId, KnowledgeItemId, MessageId, Timestamp,
};
use crate::ports::ConversationRepository;

#[derive(Clone)]
pub struct PostgresConversationRepository {
    pool: PgPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    business_id: Uuid,
    guest_id: String,
    guest_name: Option<String>,
    language: Option<String>,
    started_at: DateTime<Utc>,
    last_message_at: DateTime<Utc>,
    message_count: i32,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = DomainError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        let guest_id = GuestId::new(row.guest_id).map_err(|_| corrupt("guest_id", "<blank>"))?;
        Ok(Conversation::reconstitute(
            ConversationId::from_uuid(row.id),
            BusinessId::from_uuid(row.business_id),
            guest_id,
            row.guest_name,
            row.language,
            Timestamp::from_datetime(row.started_at),
            Timestamp::from_datetime(row.last_message_at),
            u32::try_from(row.message_count).unwrap_or(0),
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    role: String,
    content: String,
    source: Option<String>,
    model: Option<String>,
    tokens_used: Option<i32>,
    knowledge_item_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for ChatMessage {
    type Error = DomainError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let role = MessageRole::parse(&row.role).ok_or_else(|| corrupt("role", &row.role))?;
        let source = match row.source {
            Some(s) => Some(ReplySource::parse(&s).ok_or_else(|| corrupt("source", &s))?),
            None => None,
        };
        Ok(ChatMessage {
            id: MessageId::from_uuid(row.id),
            conversation_id: ConversationId::from_uuid(row.conversation_id),
            role,
            content: row.content,
            source,
            model: row.model,
            tokens_used: row.tokens_used.and_then(|t| u32::try_from(t).ok()),
            knowledge_item_ids: row
                .knowledge_item_ids
                .into_iter()
                .map(KnowledgeItemId::from_uuid)
                .collect(),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn find_by_id(&self, id: ConversationId) -> Result<Option<Conversation>, DomainError> {
        sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, business_id, guest_id, guest_name, language,
                   started_at, last_message_at, message_count
            FROM conversations WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch conversation"))?
        .map(Conversation::try_from)
        .transpose()
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        upsert_conversation(&self.pool, conversation).await
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<(), DomainError> {
        insert_message(&self.pool, message).await
    }

    async fn record_exchange(
        &self,
        conversation: &Conversation,
        messages: &[ChatMessage],
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        upsert_conversation(&mut *tx, conversation).await?;
        for message in messages {
            insert_message(&mut *tx, message).await?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit conversation exchange"))
    }

    async fn recent_messages(
        &self,
        id: ConversationId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, DomainError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT * FROM (
                SELECT id, conversation_id, role, content, source, model, tokens_used,
                       knowledge_item_ids, created_at
                FROM chat_messages
                WHERE conversation_id = $1
                ORDER BY created_at DESC
                LIMIT $2
            ) recent
            ORDER BY created_at ASC
            "#,
        )
        .bind(id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch recent messages"))?;

        rows.into_iter().map(ChatMessage::try_from).collect()
    }

    async fn count_guest_messages_since(
        &self,
        business_id: BusinessId,
        since: Timestamp,
    ) -> Result<u32, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM chat_messages m
            JOIN conversations c ON c.id = m.conversation_id
            WHERE c.business_id = $1 AND m.role = 'guest' AND m.created_at >= $2
            "#,
        )
        .bind(business_id.as_uuid())
        .bind(since.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count guest messages"))?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

async fn upsert_conversation<'e, E>(executor: E, conversation: &Conversation) -> Result<(), DomainError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO conversations (
            id, business_id, guest_id, guest_name, language,
            started_at, last_message_at, message_count
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            guest_name = EXCLUDED.guest_name,
            language = EXCLUDED.language,
            last_message_at = EXCLUDED.last_message_at,
            message_count = EXCLUDED.message_count
        "#,
    )
    .bind(conversation.id().as_uuid())
    .bind(conversation.business_id().as_uuid())
    .bind(conversation.guest_id().as_str())
    .bind(conversation.guest_name())
    .bind(conversation.language())
    .bind(conversation.started_at().as_datetime())
    .bind(conversation.last_message_at().as_datetime())
    .bind(conversation.message_count() as i32)
    .execute(executor)
    .await
    .map_err(db_error("Failed to save conversation"))?;

    Ok(())
}

async fn insert_message<'e, E>(executor: E, message: &ChatMessage) -> Result<(), DomainError>
where
    E: PgExecutor<'e>,
{
    let item_ids: Vec<Uuid> = message
        .knowledge_item_ids
        .iter()
        .map(|id| *id.as_uuid())
        .collect();

    sqlx::query(
        r#"
        INSERT INTO chat_messages (
            id, conversation_id, role, content, source, model, tokens_used,
            knowledge_item_ids, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(message.id.as_uuid())
    .bind(message.conversation_id.as_uuid())
    .bind(message.role.as_str())
    .bind(&message.content)
    .bind(message.source.map(|s| s.as_str()))
    .bind(&message.model)
    .bind(message.tokens_used.map(|t| t as i32))
    .bind(&item_ids)
    .bind(message.created_at.as_datetime())
    .execute(executor)
    .await
    .map_err(db_error("Failed to insert chat message"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_row(role: &str, source: Option<&str>) -> MessageRow {
        MessageRow {
            id: Uuid::new_v4(),
            conversation_id: Uuid::new_v4(),
            role: role.to_string(),
            content: "Check-out is at 11 AM.".to_string(),
            source: source.map(str::to_string),
            model: None,
            tokens_used: Some(42),
            knowledge_item_ids: vec![Uuid::new_v4()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn assistant_row_converts() {
        let message = ChatMessage::try_from(message_row("assistant", Some("knowledge_base"))).unwrap();
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.source, Some(ReplySource::KnowledgeBase));
        assert_eq!(message.tokens_used, Some(42));
        assert_eq!(message.knowledge_item_ids.len(), 1);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(ChatMessage::try_from(message_row("system", None)).is_err());
    }

    #[test]
    fn blank_guest_id_is_rejected() {
        let row = ConversationRow {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            guest_id: String::new(),
            guest_name: None,
            language: None,
            started_at: Utc::now(),
            last_message_at: Utc::now(),
            message_count: 0,
        };
        assert!(Conversation::try_from(row).is_err());
    }
}
