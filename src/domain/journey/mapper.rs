//! Per-guest journey reconstruction.

use serde::Serialize;

use super::{FunnelStage, Touchpoint};
use crate::domain::foundation::{GuestId, Timestamp};

const MESSAGE_WEIGHT: u32 = 2;
const EVENT_WEIGHT: u32 = 1;
const STAGE_WEIGHT: u32 = 5;
const MAX_ENGAGEMENT: u32 = 100;

/// A guest's path through the funnel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestJourney {
    pub guest_id: GuestId,
    /// Sorted by `occurred_at`.
    pub touchpoints: Vec<Touchpoint>,
    /// Distinct stages in order of first occurrence.
    pub stages_reached: Vec<FunnelStage>,
    pub current_stage: FunnelStage,
    pub furthest_stage: FunnelStage,
    pub first_seen: Option<Timestamp>,
    pub last_seen: Option<Timestamp>,
    pub duration_minutes: i64,
    pub touchpoint_count: usize,
    pub converted: bool,
    pub minutes_to_decision: Option<i64>,
    /// 0..=100.
    pub engagement_score: u32,
}

impl GuestJourney {
    /// A journey with no touchpoints.
    pub fn empty(guest_id: GuestId) -> Self {
        Self {
            guest_id,
            touchpoints: Vec::new(),
            stages_reached: Vec::new(),
            current_stage: FunnelStage::Awareness,
            furthest_stage: FunnelStage::Awareness,
            first_seen: None,
            last_seen: None,
            duration_minutes: 0,
            touchpoint_count: 0,
            converted: false,
            minutes_to_decision: None,
            engagement_score: 0,
        }
    }
}

/// Builds [`GuestJourney`] values from stored touchpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct JourneyMapper;

impl JourneyMapper {
    pub fn new() -> Self {
        Self
    }

    /// Maps one guest's touchpoints (any order) into a journey.
    pub fn map(&self, guest_id: GuestId, mut touchpoints: Vec<Touchpoint>) -> GuestJourney {
        if touchpoints.is_empty() {
            return GuestJourney::empty(guest_id);
        }
        touchpoints.sort_by_key(|tp| tp.occurred_at);

        let mut stages_reached: Vec<FunnelStage> = Vec::new();
        for tp in &touchpoints {
            if !stages_reached.contains(&tp.stage) {
                stages_reached.push(tp.stage);
            }
        }

        let first = touchpoints[0].occurred_at;
        let last = touchpoints[touchpoints.len() - 1].occurred_at;
        let current_stage = touchpoints[touchpoints.len() - 1].stage;
        let furthest_stage = stages_reached
            .iter()
            .copied()
            .max()
            .unwrap_or(FunnelStage::Awareness);

        let minutes_to_decision = touchpoints
            .iter()
            .find(|tp| tp.stage >= FunnelStage::Decision)
            .map(|tp| tp.occurred_at.duration_since(&first).num_minutes());

        let messages = touchpoints.iter().filter(|tp| tp.kind.is_message()).count() as u32;
        let events = touchpoints.len() as u32 - messages;
        let engagement_score = (MESSAGE_WEIGHT * messages
            + EVENT_WEIGHT * events
            + STAGE_WEIGHT * stages_reached.len() as u32)
            .min(MAX_ENGAGEMENT);

        GuestJourney {
            guest_id,
            touchpoint_count: touchpoints.len(),
            touchpoints,
            stages_reached,
            current_stage,
            furthest_stage,
            first_seen: Some(first),
            last_seen: Some(last),
            duration_minutes: last.duration_since(&first).num_minutes(),
            converted: furthest_stage >= FunnelStage::Decision,
            minutes_to_decision,
            engagement_score,
        }
    }

    /// Groups a business's touchpoints by guest and maps each group.
    ///
    /// Journeys come back ordered by guest id.
    pub fn map_all(&self, touchpoints: Vec<Touchpoint>) -> Vec<GuestJourney> {
        let mut by_guest: std::collections::BTreeMap<GuestId, Vec<Touchpoint>> =
            std::collections::BTreeMap::new();
        for tp in touchpoints {
            by_guest.entry(tp.guest_id.clone()).or_default().push(tp);
        }
        by_guest
            .into_iter()
            .map(|(guest_id, tps)| self.map(guest_id, tps))
            .collect()
    }
}
