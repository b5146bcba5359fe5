use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::business::BusinessProfile;
use crate::domain::foundation::{BusinessId, DomainError, ErrorCode};
use crate::domain::widget::WidgetConfig;
use crate::ports::BusinessRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryBusinessRepository {
    businesses: Arc<RwLock<HashMap<BusinessId, BusinessProfile>>>,
    widgets: Arc<RwLock<HashMap<BusinessId, WidgetConfig>>>,
}

impl InMemoryBusinessRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BusinessRepository for InMemoryBusinessRepository {
    async fn save(&self, business: &BusinessProfile) -> Result<(), DomainError> {
        self.businesses
            .write()
            .await
            .insert(business.id, business.clone());
        Ok(())
    }

    async fn update(&self, business: &BusinessProfile) -> Result<(), DomainError> {
        let mut businesses = self.businesses.write().await;
        match businesses.get_mut(&business.id) {
            Some(existing) => {
                *existing = business.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::BusinessNotFound,
                "Business not found",
            )),
        }
    }

    async fn find_by_id(&self, id: BusinessId) -> Result<Option<BusinessProfile>, DomainError> {
        Ok(self.businesses.read().await.get(&id).cloned())
    }

    async fn find_widget_config(&self, id: BusinessId) -> Result<Option<WidgetConfig>, DomainError> {
        Ok(self.widgets.read().await.get(&id).cloned())
    }

    async fn save_widget_config(&self, config: &WidgetConfig) -> Result<(), DomainError> {
        self.widgets
            .write()
            .await
            .insert(config.business_id, config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::business::BusinessType;
    use crate::domain::tier::Tier;

    #[tokio::test]
    async fn save_then_find() {
        let repo = InMemoryBusinessRepository::new();
        let business =
            BusinessProfile::new("Harbor Inn", BusinessType::Hotel, Tier::Starter).unwrap();
        repo.save(&business).await.unwrap();

        let found = repo.find_by_id(business.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Harbor Inn");
        assert!(repo.find_by_id(BusinessId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_unknown_business_fails() {
        let repo = InMemoryBusinessRepository::new();
        let business =
            BusinessProfile::new("Harbor Inn", BusinessType::Hotel, Tier::Starter).unwrap();
        let err = repo.update(&business).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessNotFound);
    }

    #[tokio::test]
    async fn widget_config_roundtrip() {
        let repo = InMemoryBusinessRepository::new();
        let business =
            BusinessProfile::new("Harbor Inn", BusinessType::Hotel, Tier::Premium).unwrap();
        let mut config = WidgetConfig::default_for(&business);
        config.primary_color = "#112233".to_string();
        repo.save_widget_config(&config).await.unwrap();

        let found = repo.find_widget_config(business.id).await.unwrap().unwrap();
        assert_eq!(found.primary_color, "#112233");
    }
}
