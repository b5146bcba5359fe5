//! Widget settings as served to the page, and the embed snippet.

use std::sync::Arc;

use serde::Serialize;

use super::WidgetError;
use crate::domain::business::BusinessProfile;
use crate::domain::foundation::BusinessId;
use crate::domain::widget::WidgetConfig;
use crate::ports::BusinessRepository;

/// Loads an active business and its effective widget settings.
///
/// Businesses without stored settings get defaults derived from the profile.
pub(super) async fn load_effective(
    businesses: &dyn BusinessRepository,
    business_id: BusinessId,
) -> Result<(BusinessProfile, WidgetConfig), WidgetError> {
    let business = businesses
        .find_by_id(business_id)
        .await?
        .filter(|b| b.active)
        .ok_or(WidgetError::BusinessNotFound(business_id))?;

    let stored = businesses
        .find_widget_config(business_id)
        .await?
        .unwrap_or_else(|| WidgetConfig::default_for(&business));
    let effective = stored.effective(&business.features());
    Ok((business, effective))
}

pub struct GetWidgetConfigHandler {
    businesses: Arc<dyn BusinessRepository>,
}

impl GetWidgetConfigHandler {
    pub fn new(businesses: Arc<dyn BusinessRepository>) -> Self {
        Self { businesses }
    }

    pub async fn handle(&self, business_id: BusinessId) -> Result<WidgetConfig, WidgetError> {
        let (_, config) = load_effective(self.businesses.as_ref(), business_id).await?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedCode {
    pub business_id: BusinessId,
    pub script_url: String,
    pub snippet: String,
}

pub struct GetEmbedCodeHandler {
    businesses: Arc<dyn BusinessRepository>,
    script_url: String,
    api_base_url: String,
}

impl GetEmbedCodeHandler {
    pub fn new(
        businesses: Arc<dyn BusinessRepository>,
        script_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        Self {
            businesses,
            script_url: script_url.into(),
            api_base_url: api_base_url.into(),
        }
    }

    pub async fn handle(&self, business_id: BusinessId) -> Result<EmbedCode, WidgetError> {
        let (_, config) = load_effective(self.businesses.as_ref(), business_id).await?;
        Ok(EmbedCode {
            business_id,
            script_url: self.script_url.clone(),
            snippet: config.embed_code(&self.script_url, &self.api_base_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBusinessRepository;
    use crate::domain::business::BusinessType;
    use crate::domain::tier::Tier;

    async fn business(repo: &InMemoryBusinessRepository, tier: Tier) -> BusinessProfile {
        let business = BusinessProfile::new("Harbor B&B", BusinessType::BedAndBreakfast, tier).unwrap();
        repo.save(&business).await.unwrap();
        business
    }

    #[tokio::test]
    async fn defaults_when_nothing_stored() {
        let repo = InMemoryBusinessRepository::new();
        let business = business(&repo, Tier::Starter).await;

        let config = GetWidgetConfigHandler::new(Arc::new(repo))
            .handle(business.id)
            .await
            .unwrap();

        assert_eq!(
            config.greeting,
            "Hi! I'm the virtual concierge for Harbor B&B. How can I help?"
        );
        assert!(config.show_branding);
    }

    #[tokio::test]
    async fn starter_cannot_hide_branding() {
        let repo = InMemoryBusinessRepository::new();
        let business = business(&repo, Tier::Starter).await;
        let mut stored = WidgetConfig::default_for(&business);
        stored.show_branding = false;
        repo.save_widget_config(&stored).await.unwrap();

        let config = GetWidgetConfigHandler::new(Arc::new(repo))
            .handle(business.id)
            .await
            .unwrap();

        assert!(config.show_branding);
    }

    #[tokio::test]
    async fn embed_code_escapes_business_name() {
        let repo = InMemoryBusinessRepository::new();
        let business = business(&repo, Tier::Premium).await;

        let embed = GetEmbedCodeHandler::new(
            Arc::new(repo),
            "https://cdn.example.com/widget.js",
            "https://api.example.com/",
        )
        .handle(business.id)
        .await
        .unwrap();

        assert!(embed.snippet.starts_with("<script src=\"https://cdn.example.com/widget.js\""));
        assert!(embed.snippet.contains(&format!("data-business-id=\"{}\"", business.id)));
        assert!(embed.snippet.contains("data-api-base=\"https://api.example.com\""));
        assert!(embed.snippet.contains("Harbor B&amp;B"));
    }

    #[tokio::test]
    async fn unknown_business_is_not_found() {
        let id = BusinessId::new();
        let err = GetWidgetConfigHandler::new(Arc::new(InMemoryBusinessRepository::new()))
            .handle(id)
            .await
            .unwrap_err();
        assert_eq!(err, WidgetError::BusinessNotFound(id));
    }
}
