//! Funnel roll-up across guest journeys.

use serde::Serialize;

use super::{FunnelStage, GuestJourney};

const HIGH_ENGAGEMENT: u32 = 60;
const MEDIUM_ENGAGEMENT: u32 = 30;

/// Guests whose furthest stage reached at least `stage`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCount {
    pub stage: FunnelStage,
    pub guests: usize,
}

/// Percentage of guests at `from` who also reached `to`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageConversion {
    pub from: FunnelStage,
    pub to: FunnelStage,
    pub rate: f64,
}

/// The stage transition that loses the most guests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropOff {
    pub from: FunnelStage,
    pub to: FunnelStage,
    pub lost: usize,
    /// Share of `from` guests lost, percent.
    pub rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngagementBuckets {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Dashboard funnel summary. All percentages carry one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelAnalytics {
    pub total_guests: usize,
    pub stage_counts: Vec<StageCount>,
    pub conversions: Vec<StageConversion>,
    pub overall_conversion_rate: f64,
    pub avg_touchpoints: f64,
    pub avg_duration_minutes: f64,
    pub avg_minutes_to_decision: f64,
    pub biggest_drop_off: Option<DropOff>,
    pub engagement: EngagementBuckets,
}

impl Default for FunnelAnalytics {
    fn default() -> Self {
        Self::from_journeys(&[])
    }
}

impl FunnelAnalytics {
    pub fn from_journeys(journeys: &[GuestJourney]) -> Self {
        let total = journeys.len();

        let stage_counts: Vec<StageCount> = FunnelStage::ALL
            .iter()
            .map(|stage| StageCount {
                stage: *stage,
                guests: journeys
                    .iter()
                    .filter(|j| j.touchpoint_count > 0 && j.furthest_stage >= *stage)
                    .count(),
            })
            .collect();

        let conversions: Vec<StageConversion> = stage_counts
            .windows(2)
            .map(|pair| StageConversion {
                from: pair[0].stage,
                to: pair[1].stage,
                rate: percent(pair[1].guests, pair[0].guests),
            })
            .collect();

        let biggest_drop_off = if total == 0 {
            None
        } else {
            stage_counts
                .windows(2)
                .map(|pair| DropOff {
                    from: pair[0].stage,
                    to: pair[1].stage,
                    lost: pair[0].guests.saturating_sub(pair[1].guests),
                    rate: percent(pair[0].guests.saturating_sub(pair[1].guests), pair[0].guests),
                })
                .fold(None, |best: Option<DropOff>, candidate| match best {
                    Some(b) if b.lost >= candidate.lost => Some(b),
                    _ => Some(candidate),
                })
        };

        let decided = count_at_least(&stage_counts, FunnelStage::Decision);

        let converted_times: Vec<i64> = journeys
            .iter()
            .filter(|j| j.converted)
            .filter_map(|j| j.minutes_to_decision)
            .collect();

        let mut engagement = EngagementBuckets::default();
        for journey in journeys {
            match journey.engagement_score {
                s if s >= HIGH_ENGAGEMENT => engagement.high += 1,
                s if s >= MEDIUM_ENGAGEMENT => engagement.medium += 1,
                _ => engagement.low += 1,
            }
        }

        Self {
            total_guests: total,
            overall_conversion_rate: percent(decided, total),
            avg_touchpoints: average(journeys.iter().map(|j| j.touchpoint_count as f64)),
            avg_duration_minutes: average(journeys.iter().map(|j| j.duration_minutes as f64)),
            avg_minutes_to_decision: average(converted_times.iter().map(|m| *m as f64)),
            stage_counts,
            conversions,
            biggest_drop_off,
            engagement,
        }
    }

    /// Guests that reached at least `stage`.
    pub fn guests_at(&self, stage: FunnelStage) -> usize {
        count_at_least(&self.stage_counts, stage)
    }
}

fn count_at_least(counts: &[StageCount], stage: FunnelStage) -> usize {
    counts
        .iter()
        .find(|c| c.stage == stage)
        .map(|c| c.guests)
        .unwrap_or(0)
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 * 100.0 / whole as f64)
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        round1(sum / n as f64)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
