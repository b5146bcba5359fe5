//! PostgreSQL implementation of KnowledgeRepository.
//!
//! Every statement filters on `business_id`; an id from another tenant
//! affects no rows and reads as not found.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::foundation::{
    BusinessId, DomainError, ErrorCode, GuestId, KnowledgeItemId, Timestamp,
};
use crate::domain::knowledge::{KnowledgeItem, UnansweredQuestion};
use crate::ports::KnowledgeRepository;

#[derive(Clone)]
pub struct PostgresKnowledgeRepository {
    pool: PgPool,
}

impl PostgresKnowledgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_items(
        &self,
        business_id: BusinessId,
        active_only: bool,
    ) -> Result<Vec<KnowledgeItem>, DomainError> {
        let rows = sqlx::query_as::<_, KnowledgeRow>(
            r#"
            SELECT id, business_id, question, answer, category, keywords, priority,
                   active, usage_count, last_used_at, created_at, updated_at
            FROM knowledge_items
            WHERE business_id = $1 AND (active OR NOT $2)
            ORDER BY priority DESC, created_at ASC
            "#,
        )
        .bind(business_id.as_uuid())
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list knowledge items"))?;

        rows.into_iter().map(KnowledgeItem::try_from).collect()
    }
}

fn not_found(id: KnowledgeItemId) -> DomainError {
    DomainError::new(
        ErrorCode::KnowledgeItemNotFound,
        format!("Knowledge item not found: {}", id),
    )
}

#[derive(Debug, sqlx::FromRow)]
struct KnowledgeRow {
    id: Uuid,
    business_id: Uuid,
    question: String,
    answer: String,
    category: Option<String>,
    keywords: Vec<String>,
    priority: i32,
    active: bool,
    usage_count: i32,
    last_used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<KnowledgeRow> for KnowledgeItem {
    type Error = DomainError;

    fn try_from(row: KnowledgeRow) -> Result<Self, Self::Error> {
        Ok(KnowledgeItem {
            id: KnowledgeItemId::from_uuid(row.id),
            business_id: BusinessId::from_uuid(row.business_id),
            question: row.question,
            answer: row.answer,
            category: row.category,
            keywords: row.keywords,
            priority: row.priority,
            active: row.active,
            usage_count: u32::try_from(row.usage_count).unwrap_or(0),
            last_used_at: row.last_used_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UnansweredRow {
    business_id: Uuid,
    guest_id: Option<String>,
    question: String,
    asked_at: DateTime<Utc>,
}

impl From<UnansweredRow> for UnansweredQuestion {
    fn from(row: UnansweredRow) -> Self {
        UnansweredQuestion {
            business_id: BusinessId::from_uuid(row.business_id),
            guest_id: row.guest_id.and_then(|g| GuestId::new(g).ok()),
            question: row.question,
            asked_at: Timestamp::from_datetime(row.asked_at),
        }
    }
}

#[async_trait]
impl KnowledgeRepository for PostgresKnowledgeRepository {
    async fn list(&self, business_id: BusinessId) -> Result<Vec<KnowledgeItem>, DomainError> {
        self.fetch_items(business_id, false).await
    }

    async fn list_active(&self, business_id: BusinessId) -> Result<Vec<KnowledgeItem>, DomainError> {
        self.fetch_items(business_id, true).await
    }

    async fn find_by_id(
        &self,
        business_id: BusinessId,
        id: KnowledgeItemId,
    ) -> Result<Option<KnowledgeItem>, DomainError> {
        sqlx::query_as::<_, KnowledgeRow>(
            r#"
            SELECT id, business_id, question, answer, category, keywords, priority,
                   active, usage_count, last_used_at, created_at, updated_at
            FROM knowledge_items
            WHERE business_id = $1 AND id = $2
            "#,
        )
        .bind(business_id.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch knowledge item"))?
        .map(KnowledgeItem::try_from)
        .transpose()
    }

    async fn save(&self, item: &KnowledgeItem) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO knowledge_items (
                id, business_id, question, answer, category, keywords, priority,
                active, usage_count, last_used_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.business_id.as_uuid())
        .bind(&item.question)
        .bind(&item.answer)
        .bind(&item.category)
        .bind(&item.keywords)
        .bind(item.priority)
        .bind(item.active)
        .bind(item.usage_count as i32)
        .bind(item.last_used_at.map(|t| *t.as_datetime()))
        .bind(item.created_at.as_datetime())
        .bind(item.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert knowledge item"))?;

        Ok(())
    }

    async fn update(&self, item: &KnowledgeItem) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE knowledge_items SET
                question = $3, answer = $4, category = $5, keywords = $6,
                priority = $7, active = $8, updated_at = $9
            WHERE business_id = $1 AND id = $2
            "#,
        )
        .bind(item.business_id.as_uuid())
        .bind(item.id.as_uuid())
        .bind(&item.question)
        .bind(&item.answer)
        .bind(&item.category)
        .bind(&item.keywords)
        .bind(item.priority)
        .bind(item.active)
        .bind(item.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update knowledge item"))?;

        if result.rows_affected() == 0 {
            return Err(not_found(item.id));
        }
        Ok(())
    }

    async fn delete(&self, business_id: BusinessId, id: KnowledgeItemId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM knowledge_items WHERE business_id = $1 AND id = $2")
            .bind(business_id.as_uuid())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete knowledge item"))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn record_usage(
        &self,
        business_id: BusinessId,
        ids: &[KnowledgeItemId],
        at: Timestamp,
    ) -> Result<(), DomainError> {
        if ids.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        sqlx::query(
            r#"
            UPDATE knowledge_items
            SET usage_count = usage_count + 1, last_used_at = $3
            WHERE business_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(business_id.as_uuid())
        .bind(&ids)
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record knowledge usage"))?;

        Ok(())
    }

    async fn record_unanswered(&self, question: &UnansweredQuestion) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO unanswered_questions (business_id, guest_id, question, asked_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(question.business_id.as_uuid())
        .bind(question.guest_id.as_ref().map(|g| g.as_str()))
        .bind(&question.question)
        .bind(question.asked_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record unanswered question"))?;

        Ok(())
    }

    async fn list_unanswered(
        &self,
        business_id: BusinessId,
        since: Timestamp,
    ) -> Result<Vec<UnansweredQuestion>, DomainError> {
        let rows = sqlx::query_as::<_, UnansweredRow>(
            r#"
            SELECT business_id, guest_id, question, asked_at
            FROM unanswered_questions
            WHERE business_id = $1 AND asked_at >= $2
            ORDER BY asked_at ASC
            "#,
        )
        .bind(business_id.as_uuid())
        .bind(since.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list unanswered questions"))?;

        Ok(rows.into_iter().map(UnansweredQuestion::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_usage_count_reads_as_zero() {
        let row = KnowledgeRow {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            question: "Is there parking?".to_string(),
            answer: "Yes, free on site.".to_string(),
            category: Some("amenities".to_string()),
            keywords: vec!["parking".to_string()],
            priority: 2,
            active: true,
            usage_count: -1,
            last_used_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let item = KnowledgeItem::try_from(row).unwrap();
        assert_eq!(item.usage_count, 0);
        assert_eq!(item.priority, 2);
    }

    #[test]
    fn blank_guest_id_is_dropped() {
        let row = UnansweredRow {
            business_id: Uuid::new_v4(),
            guest_id: Some("  ".to_string()),
            question: "Do you have a gym?".to_string(),
            asked_at: Utc::now(),
        };
        assert!(UnansweredQuestion::from(row).guest_id.is_none());
    }
}
