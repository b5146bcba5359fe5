use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{BusinessId, DomainError, GuestId, Timestamp};
use crate::domain::journey::Touchpoint;
use crate::ports::TouchpointRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryTouchpointRepository {
    touchpoints: Arc<RwLock<Vec<Touchpoint>>>,
}

impl InMemoryTouchpointRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.touchpoints.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.touchpoints.read().await.is_empty()
    }
}

#[async_trait]
impl TouchpointRepository for InMemoryTouchpointRepository {
    async fn record(&self, touchpoint: &Touchpoint) -> Result<(), DomainError> {
        self.touchpoints.write().await.push(touchpoint.clone());
        Ok(())
    }

    async fn list_since(
        &self,
        business_id: BusinessId,
        since: Timestamp,
    ) -> Result<Vec<Touchpoint>, DomainError> {
        Ok(self
            .touchpoints
            .read()
            .await
            .iter()
            .filter(|t| t.business_id == business_id && !t.occurred_at.is_before(&since))
            .cloned()
            .collect())
    }

    async fn list_for_guest(
        &self,
        business_id: BusinessId,
        guest_id: &GuestId,
    ) -> Result<Vec<Touchpoint>, DomainError> {
        Ok(self
            .touchpoints
            .read()
            .await
            .iter()
            .filter(|t| t.business_id == business_id && &t.guest_id == guest_id)
            .cloned()
            .collect())
    }
}
