//! Funnel stages and the heuristic classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a guest in the booking funnel.
///
/// Ordered: awareness < interest < consideration < decision < retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelStage {
    Awareness,
    Interest,
    Consideration,
    Decision,
    Retention,
}

impl FunnelStage {
    /// All stages in funnel order.
    pub const ALL: [FunnelStage; 5] = [
        FunnelStage::Awareness,
        FunnelStage::Interest,
        FunnelStage::Consideration,
        FunnelStage::Decision,
        FunnelStage::Retention,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunnelStage::Awareness => "awareness",
            FunnelStage::Interest => "interest",
            FunnelStage::Consideration => "consideration",
            FunnelStage::Decision => "decision",
            FunnelStage::Retention => "retention",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// The following stage, or None for retention.
    pub fn next(&self) -> Option<Self> {
        match self {
            FunnelStage::Awareness => Some(FunnelStage::Interest),
            FunnelStage::Interest => Some(FunnelStage::Consideration),
            FunnelStage::Consideration => Some(FunnelStage::Decision),
            FunnelStage::Decision => Some(FunnelStage::Retention),
            FunnelStage::Retention => None,
        }
    }
}

impl fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Checked top to bottom; first hit wins.
const MESSAGE_RULES: &[(FunnelStage, &[&str])] = &[
    (
        FunnelStage::Retention,
        &["my stay", "stayed", "review", "feedback", "come back", "return visit", "loyalty"],
    ),
    (FunnelStage::Decision, &["book", "reserv", "confirm", "deposit", "pay"]),
    (
        FunnelStage::Consideration,
        &["price", "rate", "cost", "availab", "compare", "discount", "offer", "deal", "cheap"],
    ),
    (
        FunnelStage::Interest,
        &[
            "room", "suite", "amenit", "pool", "wifi", "breakfast", "parking", "spa",
            "restaurant", "location", "check-in", "check in", "pet",
        ],
    ),
];

/// Labels a guest message with a funnel stage by substring rules.
pub fn classify_message(content: &str) -> FunnelStage {
    let lowered = content.to_lowercase();
    MESSAGE_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| lowered.contains(n)))
        .map(|(stage, _)| *stage)
        .unwrap_or(FunnelStage::Awareness)
}

/// Labels a tracked widget event with a funnel stage.
///
/// Unknown events count as awareness.
pub fn classify_event(name: &str) -> FunnelStage {
    match name.trim().to_ascii_lowercase().as_str() {
        "widget_opened" | "page_view" => FunnelStage::Awareness,
        "knowledge_viewed" => FunnelStage::Interest,
        "pricing_viewed" => FunnelStage::Consideration,
        "booking_link_clicked" | "booking_started" => FunnelStage::Decision,
        "booking_completed" | "review_left" => FunnelStage::Retention,
        _ => FunnelStage::Awareness,
    }
}
