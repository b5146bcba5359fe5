//! RecordEventHandler - stores a widget event as a journey touchpoint.

use std::sync::Arc;

use tracing::debug;

use super::WidgetError;
use crate::domain::foundation::{BusinessId, GuestId, Timestamp};
use crate::domain::journey::{FunnelStage, Touchpoint};
use crate::ports::{BusinessRepository, TouchpointRepository};

#[derive(Debug, Clone)]
pub struct RecordEventCommand {
    pub business_id: BusinessId,
    /// None issues a fresh anonymous id.
    pub guest_id: Option<GuestId>,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEventResult {
    pub guest_id: GuestId,
    pub stage: FunnelStage,
    /// False when journey tracking is switched off.
    pub recorded: bool,
}

pub struct RecordEventHandler {
    businesses: Arc<dyn BusinessRepository>,
    touchpoints: Arc<dyn TouchpointRepository>,
    tracking: bool,
}

impl RecordEventHandler {
    pub fn new(
        businesses: Arc<dyn BusinessRepository>,
        touchpoints: Arc<dyn TouchpointRepository>,
    ) -> Self {
        Self {
            businesses,
            touchpoints,
            tracking: true,
        }
    }

    pub fn with_tracking(mut self, tracking: bool) -> Self {
        self.tracking = tracking;
        self
    }

    pub async fn handle(&self, cmd: RecordEventCommand) -> Result<RecordEventResult, WidgetError> {
        self.businesses
            .find_by_id(cmd.business_id)
            .await?
            .filter(|b| b.active)
            .ok_or(WidgetError::BusinessNotFound(cmd.business_id))?;

        let guest_id = cmd.guest_id.unwrap_or_else(GuestId::anonymous);
        let touchpoint = Touchpoint::event(cmd.business_id, guest_id.clone(), &cmd.event, Timestamp::now())?;

        if self.tracking {
            self.touchpoints.record(&touchpoint).await?;
            debug!(business_id = %cmd.business_id, stage = %touchpoint.stage, "Widget event recorded");
        }

        Ok(RecordEventResult {
            guest_id,
            stage: touchpoint.stage,
            recorded: self.tracking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryBusinessRepository, InMemoryTouchpointRepository};
    use crate::domain::business::{BusinessProfile, BusinessType};
    use crate::domain::tier::Tier;

    async fn setup() -> (InMemoryBusinessRepository, InMemoryTouchpointRepository, BusinessId) {
        let businesses = InMemoryBusinessRepository::new();
        let business = BusinessProfile::new("Lakeview", BusinessType::Hotel, Tier::Professional).unwrap();
        businesses.save(&business).await.unwrap();
        (businesses, InMemoryTouchpointRepository::new(), business.id)
    }

    #[tokio::test]
    async fn booking_click_is_a_decision() {
        let (businesses, touchpoints, business_id) = setup().await;
        let guest = GuestId::new("g-9").unwrap();

        let result = RecordEventHandler::new(Arc::new(businesses), Arc::new(touchpoints.clone()))
            .handle(RecordEventCommand {
                business_id,
                guest_id: Some(guest.clone()),
                event: "Booking_Link_Clicked".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.stage, FunnelStage::Decision);
        assert!(result.recorded);
        assert_eq!(touchpoints.list_for_guest(business_id, &guest).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_event_name_is_rejected() {
        let (businesses, touchpoints, business_id) = setup().await;

        let err = RecordEventHandler::new(Arc::new(businesses), Arc::new(touchpoints.clone()))
            .handle(RecordEventCommand {
                business_id,
                guest_id: None,
                event: "drop table;".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WidgetError::Validation(_)));
        assert!(touchpoints.is_empty().await);
    }

    #[tokio::test]
    async fn tracking_off_classifies_without_storing() {
        let (businesses, touchpoints, business_id) = setup().await;

        let result = RecordEventHandler::new(Arc::new(businesses), Arc::new(touchpoints.clone()))
            .with_tracking(false)
            .handle(RecordEventCommand {
                business_id,
                guest_id: None,
                event: "pricing_viewed".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.stage, FunnelStage::Consideration);
        assert!(!result.recorded);
        assert!(result.guest_id.as_str().starts_with("guest-"));
        assert!(touchpoints.is_empty().await);
    }
}
