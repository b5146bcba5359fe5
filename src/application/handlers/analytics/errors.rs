//! Analytics-specific error types.

use thiserror::Error;

use crate::domain::foundation::{BusinessId, DomainError, ErrorCode, ValidationError};
use crate::domain::tier::{Tier, TierFeature};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Business not found: {0}")]
    BusinessNotFound(BusinessId),

    #[error("{} is not available on the {} plan", .feature.as_str(), .tier.display_name())]
    FeatureNotAvailable { feature: TierFeature, tier: Tier },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl AnalyticsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalyticsError::Validation(_) => ErrorCode::ValidationFailed,
            AnalyticsError::BusinessNotFound(_) => ErrorCode::BusinessNotFound,
            AnalyticsError::FeatureNotAvailable { .. } => ErrorCode::FeatureNotAvailable,
            AnalyticsError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for AnalyticsError {
    fn from(err: DomainError) -> Self {
        AnalyticsError::Infrastructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_error_names_feature_and_plan() {
        let err = AnalyticsError::FeatureNotAvailable {
            feature: TierFeature::JourneyAnalytics,
            tier: Tier::Starter,
        };
        assert_eq!(
            err.to_string(),
            "journey_analytics is not available on the Starter plan"
        );
        assert_eq!(err.code(), ErrorCode::FeatureNotAvailable);
    }
}
