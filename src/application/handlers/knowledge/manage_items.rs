//! Knowledge item CRUD handlers.
//!
//! Every operation is scoped to the caller's business; an item id from
//! another tenant reads as not found.

use std::sync::Arc;

use tracing::info;

use super::KnowledgeError;
use crate::domain::foundation::{BusinessId, KnowledgeItemId};
use crate::domain::knowledge::{KnowledgeItem, KnowledgeItemDraft};
use crate::ports::KnowledgeRepository;

/// Lists all items, active or not, priority first.
pub struct ListKnowledgeHandler {
    repository: Arc<dyn KnowledgeRepository>,
}

impl ListKnowledgeHandler {
    pub fn new(repository: Arc<dyn KnowledgeRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, business_id: BusinessId) -> Result<Vec<KnowledgeItem>, KnowledgeError> {
        Ok(self.repository.list(business_id).await?)
    }
}

#[derive(Debug, Clone)]
pub struct CreateKnowledgeCommand {
    pub business_id: BusinessId,
    pub draft: KnowledgeItemDraft,
}

pub struct CreateKnowledgeHandler {
    repository: Arc<dyn KnowledgeRepository>,
}

impl CreateKnowledgeHandler {
    pub fn new(repository: Arc<dyn KnowledgeRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreateKnowledgeCommand) -> Result<KnowledgeItem, KnowledgeError> {
        let item = KnowledgeItem::create(cmd.business_id, cmd.draft)?;
        self.repository.save(&item).await?;

        info!(business_id = %item.business_id, item_id = %item.id, "Knowledge item created");
        Ok(item)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateKnowledgeCommand {
    pub business_id: BusinessId,
    pub item_id: KnowledgeItemId,
    pub draft: KnowledgeItemDraft,
}

pub struct UpdateKnowledgeHandler {
    repository: Arc<dyn KnowledgeRepository>,
}

impl UpdateKnowledgeHandler {
    pub fn new(repository: Arc<dyn KnowledgeRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateKnowledgeCommand) -> Result<KnowledgeItem, KnowledgeError> {
        let mut item = self
            .repository
            .find_by_id(cmd.business_id, cmd.item_id)
            .await?
            .ok_or(KnowledgeError::NotFound(cmd.item_id))?;

        item.apply(cmd.draft)?;
        self.repository
            .update(&item)
            .await
            .map_err(KnowledgeError::for_item(cmd.item_id))?;

        Ok(item)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteKnowledgeCommand {
    pub business_id: BusinessId,
    pub item_id: KnowledgeItemId,
}

pub struct DeleteKnowledgeHandler {
    repository: Arc<dyn KnowledgeRepository>,
}

impl DeleteKnowledgeHandler {
    pub fn new(repository: Arc<dyn KnowledgeRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteKnowledgeCommand) -> Result<(), KnowledgeError> {
        self.repository
            .delete(cmd.business_id, cmd.item_id)
            .await
            .map_err(KnowledgeError::for_item(cmd.item_id))?;

        info!(business_id = %cmd.business_id, item_id = %cmd.item_id, "Knowledge item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryKnowledgeRepository;
    use crate::domain::foundation::ValidationError;

    fn draft(question: &str, answer: &str) -> KnowledgeItemDraft {
        KnowledgeItemDraft {
            question: question.to_string(),
            answer: answer.to_string(),
            keywords: vec!["Parking".to_string(), " parking ".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_then_list() {
        let repo = Arc::new(InMemoryKnowledgeRepository::new());
        let business_id = BusinessId::new();

        let item = CreateKnowledgeHandler::new(repo.clone())
            .handle(CreateKnowledgeCommand {
                business_id,
                draft: draft("Is there parking?", "Yes, free on site."),
            })
            .await
            .unwrap();

        assert_eq!(item.keywords, vec!["parking".to_string()]);
        let items = ListKnowledgeHandler::new(repo.clone()).handle(business_id).await.unwrap();
        assert_eq!(items, vec![item]);
        assert!(ListKnowledgeHandler::new(repo)
            .handle(BusinessId::new())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn create_rejects_blank_answer() {
        let repo = Arc::new(InMemoryKnowledgeRepository::new());

        let err = CreateKnowledgeHandler::new(repo)
            .handle(CreateKnowledgeCommand {
                business_id: BusinessId::new(),
                draft: draft("Is there parking?", "  "),
            })
            .await
            .unwrap_err();

        assert_eq!(err, KnowledgeError::Validation(ValidationError::empty_field("answer")));
    }

    #[tokio::test]
    async fn update_keeps_usage_and_replaces_text() {
        let repo = Arc::new(InMemoryKnowledgeRepository::new());
        let business_id = BusinessId::new();
        let item = CreateKnowledgeHandler::new(repo.clone())
            .handle(CreateKnowledgeCommand {
                business_id,
                draft: draft("Is there parking?", "Yes."),
            })
            .await
            .unwrap();
        repo.record_usage(business_id, &[item.id], crate::domain::foundation::Timestamp::now())
            .await
            .unwrap();

        let updated = UpdateKnowledgeHandler::new(repo.clone())
            .handle(UpdateKnowledgeCommand {
                business_id,
                item_id: item.id,
                draft: draft("Is there parking?", "Yes, 20 spaces, free for guests."),
            })
            .await
            .unwrap();

        assert_eq!(updated.answer, "Yes, 20 spaces, free for guests.");
        assert_eq!(updated.usage_count, 1);
    }

    #[tokio::test]
    async fn other_tenants_items_are_not_found() {
        let repo = Arc::new(InMemoryKnowledgeRepository::new());
        let owner = BusinessId::new();
        let item = CreateKnowledgeHandler::new(repo.clone())
            .handle(CreateKnowledgeCommand {
                business_id: owner,
                draft: draft("Is there parking?", "Yes."),
            })
            .await
            .unwrap();
        let intruder = BusinessId::new();

        let err = UpdateKnowledgeHandler::new(repo.clone())
            .handle(UpdateKnowledgeCommand {
                business_id: intruder,
                item_id: item.id,
                draft: draft("Hijacked", "Hijacked"),
            })
            .await
            .unwrap_err();
        assert_eq!(err, KnowledgeError::NotFound(item.id));

        let err = DeleteKnowledgeHandler::new(repo.clone())
            .handle(DeleteKnowledgeCommand {
                business_id: intruder,
                item_id: item.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err, KnowledgeError::NotFound(item.id));

        DeleteKnowledgeHandler::new(repo.clone())
            .handle(DeleteKnowledgeCommand {
                business_id: owner,
                item_id: item.id,
            })
            .await
            .unwrap();
        assert!(repo.list(owner).await.unwrap().is_empty());
    }
}
