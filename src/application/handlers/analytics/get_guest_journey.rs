//! GetGuestJourneyHandler - Query handler for one guest's path through the funnel.

use std::sync::Arc;

use tracing::error;

use super::access::require_feature;
use super::AnalyticsError;
use crate::domain::foundation::{BusinessId, GuestId};
use crate::domain::journey::{GuestJourney, JourneyMapper};
use crate::domain::tier::TierFeature;
use crate::ports::{BusinessRepository, TouchpointRepository};

#[derive(Debug, Clone)]
pub struct GetGuestJourneyQuery {
    pub business_id: BusinessId,
    pub guest_id: GuestId,
}

pub struct GetGuestJourneyHandler {
    businesses: Arc<dyn BusinessRepository>,
    touchpoints: Arc<dyn TouchpointRepository>,
    mapper: JourneyMapper,
}

impl GetGuestJourneyHandler {
    pub fn new(
        businesses: Arc<dyn BusinessRepository>,
        touchpoints: Arc<dyn TouchpointRepository>,
    ) -> Self {
        Self {
            businesses,
            touchpoints,
            mapper: JourneyMapper::new(),
        }
    }

    /// Unknown guests get an empty journey, as do storage failures.
    pub async fn handle(&self, query: GetGuestJourneyQuery) -> Result<GuestJourney, AnalyticsError> {
        require_feature(
            self.businesses.as_ref(),
            query.business_id,
            TierFeature::JourneyAnalytics,
        )
        .await?;

        match self
            .touchpoints
            .list_for_guest(query.business_id, &query.guest_id)
            .await
        {
            Ok(touchpoints) => Ok(self.mapper.map(query.guest_id, touchpoints)),
            Err(e) => {
                error!(
                    business_id = %query.business_id,
                    guest_id = %query.guest_id,
                    error = %e,
                    "Guest journey unavailable, returning empty journey"
                );
                Ok(GuestJourney::empty(query.guest_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryBusinessRepository, InMemoryTouchpointRepository};
    use crate::application::handlers::analytics::get_funnel::tests::{business_on, BrokenTouchpoints};
    use crate::domain::foundation::Timestamp;
    use crate::domain::journey::{FunnelStage, Touchpoint};
    use crate::domain::tier::Tier;

    #[tokio::test]
    async fn maps_recorded_touchpoints() {
        let businesses = InMemoryBusinessRepository::new();
        let touchpoints = InMemoryTouchpointRepository::new();
        let business = business_on(&businesses, Tier::Premium).await;
        let guest = GuestId::new("g-42").unwrap();
        let start = Timestamp::now();

        touchpoints
            .record(&Touchpoint::event(business.id, guest.clone(), "widget_opened", start).unwrap())
            .await
            .unwrap();
        touchpoints
            .record(&Touchpoint::message(business.id, guest.clone(), "What are your rates?", start.plus_minutes(3)))
            .await
            .unwrap();

        let journey = GetGuestJourneyHandler::new(Arc::new(businesses), Arc::new(touchpoints))
            .handle(GetGuestJourneyQuery {
                business_id: business.id,
                guest_id: guest,
            })
            .await
            .unwrap();

        assert_eq!(journey.touchpoint_count, 2);
        assert_eq!(journey.current_stage, FunnelStage::Consideration);
        assert_eq!(journey.duration_minutes, 3);
        assert!(!journey.converted);
    }

    #[tokio::test]
    async fn storage_failure_yields_empty_journey() {
        let businesses = InMemoryBusinessRepository::new();
        let business = business_on(&businesses, Tier::Professional).await;
        let guest = GuestId::new("g-1").unwrap();

        let journey = GetGuestJourneyHandler::new(Arc::new(businesses), Arc::new(BrokenTouchpoints))
            .handle(GetGuestJourneyQuery {
                business_id: business.id,
                guest_id: guest.clone(),
            })
            .await
            .unwrap();

        assert_eq!(journey, GuestJourney::empty(guest));
    }

    #[tokio::test]
    async fn missing_business_is_not_found() {
        let business_id = BusinessId::new();

        let err = GetGuestJourneyHandler::new(
            Arc::new(InMemoryBusinessRepository::new()),
            Arc::new(InMemoryTouchpointRepository::new()),
        )
        .handle(GetGuestJourneyQuery {
            business_id,
            guest_id: GuestId::new("g-1").unwrap(),
        })
        .await
        .unwrap_err();

        assert_eq!(err, AnalyticsError::BusinessNotFound(business_id));
    }
}
