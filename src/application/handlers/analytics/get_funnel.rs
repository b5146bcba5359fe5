//! GetFunnelHandler - Query handler for the booking funnel roll-up.

use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use super::access::require_feature;
use super::AnalyticsError;
use crate::domain::foundation::{BusinessId, Timestamp, ValidationError};
use crate::domain::journey::{FunnelAnalytics, JourneyMapper};
use crate::domain::tier::TierFeature;
use crate::ports::{BusinessRepository, TouchpointRepository};

pub const DEFAULT_FUNNEL_DAYS: u32 = 30;
pub const MAX_FUNNEL_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy)]
pub struct GetFunnelQuery {
    pub business_id: BusinessId,
    /// Look-back window, 1..=365.
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelReport {
    pub days: u32,
    pub since: Timestamp,
    #[serde(flatten)]
    pub analytics: FunnelAnalytics,
}

pub struct GetFunnelHandler {
    businesses: Arc<dyn BusinessRepository>,
    touchpoints: Arc<dyn TouchpointRepository>,
    mapper: JourneyMapper,
}

impl GetFunnelHandler {
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

    pub async fn handle(&self, query: GetFunnelQuery) -> Result<FunnelReport, AnalyticsError> {
        if !(1..=MAX_FUNNEL_DAYS).contains(&query.days) {
            return Err(ValidationError::out_of_range(
                "days",
                1,
                MAX_FUNNEL_DAYS as i64,
                query.days as i64,
            )
            .into());
        }
        require_feature(
            self.businesses.as_ref(),
            query.business_id,
            TierFeature::JourneyAnalytics,
        )
        .await?;

        let since = Timestamp::now().minus_days(query.days as i64);
        let analytics = match self.touchpoints.list_since(query.business_id, since).await {
            Ok(touchpoints) => FunnelAnalytics::from_journeys(&self.mapper.map_all(touchpoints)),
            Err(e) => {
                error!(business_id = %query.business_id, error = %e, "Funnel analytics unavailable, returning defaults");
                FunnelAnalytics::default()
            }
        };

        Ok(FunnelReport {
            days: query.days,
            since,
            analytics,
        })
    }
}
