//! Knowledge gap detection.
//!
//! Unanswered questions are grouped by a signature made of their sorted,
//! distinct, non-stop-word tokens, so "Is there a gym?" and "there a gym"
//! land in the same bucket.

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::foundation::Timestamp;
use crate::domain::knowledge::{token_set, UnansweredQuestion};

/// Upper bound on suggestions returned.
pub const MAX_GAPS: usize = 20;

const CATEGORY_VOCAB: &[(&str, &[&str])] = &[
    (
        "pricing",
        &["price", "rate", "cost", "discount", "offer", "deal", "cheap", "fee", "charge"],
    ),
    ("booking", &["book", "reserv", "cancel", "deposit", "confirm", "availab", "pay"]),
    ("policies", &["pet", "dog", "smok", "child", "kid", "policy", "rule", "luggage"]),
    (
        "location",
        &["where", "location", "airport", "station", "beach", "downtown", "near", "distance", "direction"],
    ),
    (
        "amenities",
        &[
            "pool", "wifi", "breakfast", "parking", "spa", "gym", "restaurant", "bar", "room",
            "suite", "amenit", "towel", "laundry",
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapOptions {
    pub min_occurrences: usize,
    pub limit: usize,
}

impl Default for GapOptions {
    fn default() -> Self {
        Self {
            min_occurrences: 2,
            limit: MAX_GAPS,
        }
    }
}

/// A recurring question the knowledge base cannot answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeGap {
    /// Most recent phrasing.
    pub example_question: String,
    pub occurrences: usize,
    pub suggested_category: &'static str,
    pub first_asked: Timestamp,
    pub last_asked: Timestamp,
    pub signature: String,
}

pub fn detect_knowledge_gaps(questions: &[UnansweredQuestion], options: GapOptions) -> Vec<KnowledgeGap> {
    let mut groups: HashMap<String, Vec<&UnansweredQuestion>> = HashMap::new();
    for question in questions {
        let tokens = token_set(&question.question);
        if tokens.is_empty() {
            continue;
        }
        let signature = tokens.into_iter().collect::<Vec<_>>().join(" ");
        groups.entry(signature).or_default().push(question);
    }

    let mut gaps: Vec<KnowledgeGap> = groups
        .into_iter()
        .filter(|(_, asked)| asked.len() >= options.min_occurrences.max(1))
        .filter_map(|(signature, asked)| {
            let latest = asked.iter().max_by_key(|q| q.asked_at)?;
            let earliest = asked.iter().min_by_key(|q| q.asked_at)?;
            Some(KnowledgeGap {
                example_question: latest.question.trim().to_string(),
                occurrences: asked.len(),
                suggested_category: suggest_category(&signature),
                first_asked: earliest.asked_at,
                last_asked: latest.asked_at,
                signature,
            })
        })
        .collect();

    gaps.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| b.last_asked.cmp(&a.last_asked))
            .then_with(|| a.signature.cmp(&b.signature))
    });
    gaps.truncate(options.limit.min(MAX_GAPS));
    gaps
}

fn suggest_category(signature: &str) -> &'static str {
    let tokens: Vec<&str> = signature.split(' ').collect();
    CATEGORY_VOCAB
        .iter()
        .find(|(_, stems)| {
            tokens
                .iter()
                .any(|t| stems.iter().any(|stem| t.starts_with(stem)))
        })
        .map(|(category, _)| *category)
        .unwrap_or("general")
}
