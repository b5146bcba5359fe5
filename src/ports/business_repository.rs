//! Business repository port.
//!
//! Business profiles and their widget settings are read on every widget
//! request and written from the dashboard.

use async_trait::async_trait;

use crate::domain::business::BusinessProfile;
use crate::domain::foundation::{BusinessId, DomainError};
use crate::domain::widget::WidgetConfig;

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    /// Save a new business.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, business: &BusinessProfile) -> Result<(), DomainError>;

    /// Update an existing business.
    ///
    /// # Errors
    ///
    /// - `BusinessNotFound` if the business doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, business: &BusinessProfile) -> Result<(), DomainError>;

    /// Find a business by ID, active or not.
    async fn find_by_id(&self, id: BusinessId) -> Result<Option<BusinessProfile>, DomainError>;

    /// Stored widget settings, `None` when the business never customized them.
    async fn find_widget_config(&self, id: BusinessId) -> Result<Option<WidgetConfig>, DomainError>;

    /// Insert or replace widget settings.
    async fn save_widget_config(&self, config: &WidgetConfig) -> Result<(), DomainError>;
}
