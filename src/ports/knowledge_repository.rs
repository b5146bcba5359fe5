//! Knowledge base repository port.
//!
//! Every method is scoped by business id; an item id from another tenant
//! behaves exactly like a missing one.

use async_trait::async_trait;

use crate::domain::foundation::{BusinessId, DomainError, KnowledgeItemId, Timestamp};
use crate::domain::knowledge::{KnowledgeItem, UnansweredQuestion};

#[async_trait]
pub trait KnowledgeRepository: Send + Sync {
    /// All items of a business, active or not, newest first.
    async fn list(&self, business_id: BusinessId) -> Result<Vec<KnowledgeItem>, DomainError>;

    /// Active items only; the search candidate set.
    async fn list_active(&self, business_id: BusinessId) -> Result<Vec<KnowledgeItem>, DomainError>;

    async fn find_by_id(
        &self,
        business_id: BusinessId,
        id: KnowledgeItemId,
    ) -> Result<Option<KnowledgeItem>, DomainError>;

    async fn save(&self, item: &KnowledgeItem) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `KnowledgeItemNotFound` if the item doesn't exist for this business
    async fn update(&self, item: &KnowledgeItem) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `KnowledgeItemNotFound` if the item doesn't exist for this business
    async fn delete(&self, business_id: BusinessId, id: KnowledgeItemId) -> Result<(), DomainError>;

    /// Increments usage counters of the given items. Unknown ids are ignored.
    async fn record_usage(
        &self,
        business_id: BusinessId,
        ids: &[KnowledgeItemId],
        at: Timestamp,
    ) -> Result<(), DomainError>;

    async fn record_unanswered(&self, question: &UnansweredQuestion) -> Result<(), DomainError>;

    /// Unanswered questions asked at or after `since`.
    async fn list_unanswered(
        &self,
        business_id: BusinessId,
        since: Timestamp,
    ) -> Result<Vec<UnansweredQuestion>, DomainError>;
}
