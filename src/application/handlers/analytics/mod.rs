//! Dashboard analytics: funnel roll-ups, single-guest journeys and
//! knowledge gap suggestions.
//!
//! Each query is gated on a tier feature. Storage failures while reading
//! touchpoints or unanswered questions are logged and answered with zeroed
//! defaults so the dashboard keeps rendering.

mod access;
mod errors;
mod get_funnel;
mod get_guest_journey;
mod get_knowledge_gaps;

pub use errors::AnalyticsError;
pub use get_funnel::{FunnelReport, GetFunnelHandler, GetFunnelQuery, DEFAULT_FUNNEL_DAYS, MAX_FUNNEL_DAYS};
pub use get_guest_journey::{GetGuestJourneyHandler, GetGuestJourneyQuery};
pub use get_knowledge_gaps::{GapReport, GetKnowledgeGapsHandler, GetKnowledgeGapsQuery};
