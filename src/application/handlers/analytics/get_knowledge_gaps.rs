//! GetKnowledgeGapsHandler - Query handler for self-learning suggestions.

use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use super::access::require_feature;
use super::AnalyticsError;
use crate::domain::foundation::{BusinessId, Timestamp, ValidationError};
use crate::domain::learning::{detect_knowledge_gaps, GapOptions, KnowledgeGap};
use crate::domain::tier::TierFeature;
use crate::ports::{BusinessRepository, KnowledgeRepository};

const DEFAULT_GAP_DAYS: u32 = 30;
const MAX_GAP_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy)]
pub struct GetKnowledgeGapsQuery {
    pub business_id: BusinessId,
    pub days: Option<u32>,
    pub min_occurrences: Option<usize>,
}

impl GetKnowledgeGapsQuery {
    pub fn new(business_id: BusinessId) -> Self {
        Self {
            business_id,
            days: None,
            min_occurrences: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapReport {
    pub since: Timestamp,
    pub gaps: Vec<KnowledgeGap>,
}

pub struct GetKnowledgeGapsHandler {
    businesses: Arc<dyn BusinessRepository>,
    knowledge: Arc<dyn KnowledgeRepository>,
    enabled: bool,
}

impl GetKnowledgeGapsHandler {
    pub fn new(
        businesses: Arc<dyn BusinessRepository>,
        knowledge: Arc<dyn KnowledgeRepository>,
    ) -> Self {
        Self {
            businesses,
            knowledge,
            enabled: true,
        }
    }

    /// Turns gap detection off service-wide; queries then return no gaps.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub async fn handle(&self, query: GetKnowledgeGapsQuery) -> Result<GapReport, AnalyticsError> {
        let days = query.days.unwrap_or(DEFAULT_GAP_DAYS);
        if !(1..=MAX_GAP_DAYS).contains(&days) {
            return Err(
                ValidationError::out_of_range("days", 1, MAX_GAP_DAYS as i64, days as i64).into(),
            );
        }
        require_feature(
            self.businesses.as_ref(),
            query.business_id,
            TierFeature::SelfLearning,
        )
        .await?;

        let since = Timestamp::now().minus_days(days as i64);
        if !self.enabled {
            return Ok(GapReport {
                since,
                gaps: Vec::new(),
            });
        }

        let options = GapOptions {
            min_occurrences: query
                .min_occurrences
                .unwrap_or(GapOptions::default().min_occurrences),
            ..GapOptions::default()
        };
        let gaps = match self.knowledge.list_unanswered(query.business_id, since).await {
            Ok(questions) => detect_knowledge_gaps(&questions, options),
            Err(e) => {
                error!(business_id = %query.business_id, error = %e, "Unanswered questions unavailable, returning no gaps");
                Vec::new()
            }
        };

        Ok(GapReport { since, gaps })
    }
}
