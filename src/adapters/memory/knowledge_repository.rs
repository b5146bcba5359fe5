use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{BusinessId, DomainError, ErrorCode, KnowledgeItemId, Timestamp};
use crate::domain::knowledge::{KnowledgeItem, UnansweredQuestion};
use crate::ports::KnowledgeRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeRepository {
    items: Arc<RwLock<HashMap<KnowledgeItemId, KnowledgeItem>>>,
    unanswered: Arc<RwLock<Vec<UnansweredQuestion>>>,
}

impl InMemoryKnowledgeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unanswered questions recorded, across all tenants.
    pub async fn unanswered_count(&self) -> usize {
        self.unanswered.read().await.len()
    }
}

fn not_found() -> DomainError {
    DomainError::new(ErrorCode::KnowledgeItemNotFound, "Knowledge item not found")
}

#[async_trait]
impl KnowledgeRepository for InMemoryKnowledgeRepository {
    async fn list(&self, business_id: BusinessId) -> Result<Vec<KnowledgeItem>, DomainError> {
        let mut items: Vec<_> = self
            .items
            .read()
            .await
            .values()
            .filter(|item| item.business_id == business_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.created_at.cmp(&b.created_at)));
        Ok(items)
    }

    async fn list_active(&self, business_id: BusinessId) -> Result<Vec<KnowledgeItem>, DomainError> {
        let mut items = self.list(business_id).await?;
        items.retain(|item| item.active);
        Ok(items)
    }

    async fn find_by_id(
        &self,
        business_id: BusinessId,
        id: KnowledgeItemId,
    ) -> Result<Option<KnowledgeItem>, DomainError> {
        Ok(self
            .items
            .read()
            .await
            .get(&id)
            .filter(|item| item.business_id == business_id)
            .cloned())
    }

    async fn save(&self, item: &KnowledgeItem) -> Result<(), DomainError> {
        self.items.write().await.insert(item.id, item.clone());
        Ok(())
    }

    async fn update(&self, item: &KnowledgeItem) -> Result<(), DomainError> {
        let mut items = self.items.write().await;
        match items.get_mut(&item.id) {
            Some(existing) if existing.business_id == item.business_id => {
                *existing = item.clone();
                Ok(())
            }
            _ => Err(not_found()),
        }
    }

    async fn delete(&self, business_id: BusinessId, id: KnowledgeItemId) -> Result<(), DomainError> {
        let mut items = self.items.write().await;
        match items.get(&id) {
            Some(item) if item.business_id == business_id => {
                items.remove(&id);
                Ok(())
            }
            _ => Err(not_found()),
        }
    }

    async fn record_usage(
        &self,
        business_id: BusinessId,
        ids: &[KnowledgeItemId],
        at: Timestamp,
    ) -> Result<(), DomainError> {
        let mut items = self.items.write().await;
        for id in ids {
            if let Some(item) = items.get_mut(id).filter(|i| i.business_id == business_id) {
                item.record_usage(at);
            }
        }
        Ok(())
    }

    async fn record_unanswered(&self, question: &UnansweredQuestion) -> Result<(), DomainError> {
        self.unanswered.write().await.push(question.clone());
        Ok(())
    }

    async fn list_unanswered(
        &self,
        business_id: BusinessId,
        since: Timestamp,
    ) -> Result<Vec<UnansweredQuestion>, DomainError> {
        Ok(self
            .unanswered
            .read()
            .await
            .iter()
            .filter(|q| q.business_id == business_id && !q.asked_at.is_before(&since))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge::KnowledgeItemDraft;

    fn item(business_id: BusinessId, question: &str) -> KnowledgeItem {
        KnowledgeItem::create(
            business_id,
            KnowledgeItemDraft {
                question: question.to_string(),
                answer: "An answer.".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn queries_are_tenant_scoped() {
        let repo = InMemoryKnowledgeRepository::new();
        let mine = BusinessId::new();
        let theirs = BusinessId::new();
        let item = item(theirs, "Is there parking?");
        repo.save(&item).await.unwrap();

        assert!(repo.list(mine).await.unwrap().is_empty());
        assert!(repo.find_by_id(mine, item.id).await.unwrap().is_none());
        assert!(repo.delete(mine, item.id).await.is_err());
        assert_eq!(repo.list(theirs).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_active_skips_inactive() {
        let repo = InMemoryKnowledgeRepository::new();
        let business_id = BusinessId::new();
        let mut inactive = item(business_id, "Old question");
        inactive.active = false;
        repo.save(&inactive).await.unwrap();
        repo.save(&item(business_id, "Current question")).await.unwrap();

        let active = repo.list_active(business_id).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].question, "Current question");
    }

    #[tokio::test]
    async fn record_usage_increments_counter() {
        let repo = InMemoryKnowledgeRepository::new();
        let business_id = BusinessId::new();
        let item = item(business_id, "Is breakfast included?");
        repo.save(&item).await.unwrap();

        let at = Timestamp::now();
        repo.record_usage(business_id, &[item.id], at).await.unwrap();
        repo.record_usage(business_id, &[item.id], at).await.unwrap();

        let stored = repo.find_by_id(business_id, item.id).await.unwrap().unwrap();
        assert_eq!(stored.usage_count, 2);
        assert_eq!(stored.last_used_at, Some(at));
    }

    #[tokio::test]
    async fn unanswered_filtered_by_business_and_time() {
        let repo = InMemoryKnowledgeRepository::new();
        let business_id = BusinessId::new();
        let mut old = UnansweredQuestion::new(business_id, None, "Do you have a gym?");
        old.asked_at = Timestamp::now().minus_days(40);
        repo.record_unanswered(&old).await.unwrap();
        repo.record_unanswered(&UnansweredQuestion::new(business_id, None, "Is there a sauna?"))
            .await
            .unwrap();
        repo.record_unanswered(&UnansweredQuestion::new(BusinessId::new(), None, "Other"))
            .await
            .unwrap();

        let since = Timestamp::now().minus_days(30);
        let recent = repo.list_unanswered(business_id, since).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].question, "Is there a sauna?");
        assert_eq!(repo.unanswered_count().await, 3);
    }
}
