//! UpdateWidgetConfigHandler - partial update of a business's widget settings.

use std::sync::Arc;

use tracing::info;

use super::get_config::load_effective;
use super::WidgetError;
use crate::domain::foundation::{BusinessId, ValidationError};
use crate::domain::widget::{WidgetConfig, WidgetPosition};
use crate::ports::BusinessRepository;

/// Fields left as None keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateWidgetConfigCommand {
    pub business_id: BusinessId,
    pub primary_color: Option<String>,
    pub position: Option<String>,
    pub greeting: Option<String>,
    pub placeholder: Option<String>,
    pub launcher_label: Option<String>,
    pub show_branding: Option<bool>,
}

pub struct UpdateWidgetConfigHandler {
    businesses: Arc<dyn BusinessRepository>,
}

impl UpdateWidgetConfigHandler {
    pub fn new(businesses: Arc<dyn BusinessRepository>) -> Self {
        Self { businesses }
    }

    /// Returns the settings as the widget will now see them.
    pub async fn handle(&self, cmd: UpdateWidgetConfigCommand) -> Result<WidgetConfig, WidgetError> {
        let (business, _) = load_effective(self.businesses.as_ref(), cmd.business_id).await?;
        let mut config = self
            .businesses
            .find_widget_config(cmd.business_id)
            .await?
            .unwrap_or_else(|| WidgetConfig::default_for(&business));

        if let Some(color) = cmd.primary_color {
            config.primary_color = color.trim().to_string();
        }
        if let Some(position) = cmd.position {
            config.position = WidgetPosition::parse(position.trim()).ok_or_else(|| {
                ValidationError::invalid_format("position", "expected bottom_right or bottom_left")
            })?;
        }
        if let Some(greeting) = cmd.greeting {
            config.greeting = greeting.trim().to_string();
        }
        if let Some(placeholder) = cmd.placeholder {
            config.placeholder = placeholder.trim().to_string();
        }
        if let Some(label) = cmd.launcher_label {
            config.launcher_label = label.trim().to_string();
        }
        if let Some(show) = cmd.show_branding {
            config.show_branding = show;
        }
        config.validate()?;

        self.businesses.save_widget_config(&config).await?;
        info!(business_id = %cmd.business_id, "Widget settings updated");

        Ok(config.effective(&business.features()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBusinessRepository;
    use crate::domain::business::{BusinessProfile, BusinessType};
    use crate::domain::tier::Tier;

    async fn setup(tier: Tier) -> (InMemoryBusinessRepository, BusinessId) {
        let repo = InMemoryBusinessRepository::new();
        let business = BusinessProfile::new("Dune Hostel", BusinessType::Hostel, tier).unwrap();
        repo.save(&business).await.unwrap();
        (repo, business.id)
    }

    #[tokio::test]
    async fn applies_partial_changes() {
        let (repo, business_id) = setup(Tier::Premium).await;

        let config = UpdateWidgetConfigHandler::new(Arc::new(repo.clone()))
            .handle(UpdateWidgetConfigCommand {
                business_id,
                primary_color: Some("#10B981".to_string()),
                position: Some("bottom_left".to_string()),
                show_branding: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(config.primary_color, "#10B981");
        assert_eq!(config.position, WidgetPosition::BottomLeft);
        assert!(!config.show_branding);
        let stored = repo.find_widget_config(business_id).await.unwrap().unwrap();
        assert_eq!(stored, config);
    }

    #[tokio::test]
    async fn rejects_invalid_values() {
        let (repo, business_id) = setup(Tier::Starter).await;
        let handler = UpdateWidgetConfigHandler::new(Arc::new(repo.clone()));

        let err = handler
            .handle(UpdateWidgetConfigCommand {
                business_id,
                primary_color: Some("blue".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WidgetError::Validation(_)));

        let err = handler
            .handle(UpdateWidgetConfigCommand {
                business_id,
                position: Some("top_center".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WidgetError::Validation(_)));
        assert!(repo.find_widget_config(business_id).await.unwrap().is_none());
    }
}
