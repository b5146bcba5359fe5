//! Tenant lookup and tier gating shared by the analytics queries.

use crate::domain::business::BusinessProfile;
use crate::domain::foundation::BusinessId;
use crate::domain::tier::TierFeature;
use crate::ports::BusinessRepository;

use super::AnalyticsError;

pub(super) async fn require_feature(
    businesses: &dyn BusinessRepository,
    business_id: BusinessId,
    feature: TierFeature,
) -> Result<BusinessProfile, AnalyticsError> {
    let business = businesses
        .find_by_id(business_id)
        .await?
        .ok_or(AnalyticsError::BusinessNotFound(business_id))?;

    if !business.features().has(feature) {
        return Err(AnalyticsError::FeatureNotAvailable {
            feature,
            tier: business.tier,
        });
    }
    Ok(business)
}
