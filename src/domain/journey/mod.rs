//! Guest journey mapping and funnel analytics.
//!
//! Every guest interaction is stored as a [`Touchpoint`] labeled with a
//! [`FunnelStage`]. Journeys are rebuilt per guest on demand and rolled up
//! into [`FunnelAnalytics`] for the dashboard.

mod funnel;
mod mapper;
mod stage;
mod touchpoint;

pub use funnel::{DropOff, EngagementBuckets, FunnelAnalytics, StageConversion, StageCount};
pub use mapper::{GuestJourney, JourneyMapper};
pub use stage::{classify_event, classify_message, FunnelStage};
pub use touchpoint::{Touchpoint, TouchpointKind};
