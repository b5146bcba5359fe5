//! Journey touchpoint repository port.

use async_trait::async_trait;

use crate::domain::foundation::{BusinessId, DomainError, GuestId, Timestamp};
use crate::domain::journey::Touchpoint;

#[async_trait]
pub trait TouchpointRepository: Send + Sync {
    async fn record(&self, touchpoint: &Touchpoint) -> Result<(), DomainError>;

    /// All touchpoints of a business at or after `since`, any order.
    async fn list_since(
        &self,
        business_id: BusinessId,
        since: Timestamp,
    ) -> Result<Vec<Touchpoint>, DomainError>;

    /// One guest's touchpoints, any order.
    async fn list_for_guest(
        &self,
        business_id: BusinessId,
        guest_id: &GuestId,
    ) -> Result<Vec<Touchpoint>, DomainError>;
}
