//! Keyword-overlap knowledge base retrieval.
//!
//! Scoring is additive per item:
//!
//! | Signal | Points |
//! |--------|--------|
//! | keyword hit | +3.0 each |
//! | message token in question | +1.0 each |
//! | message token in answer | +0.5 each, at most +2.0 |
//! | category named in message | +1.5 |

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::text::{token_set, tokenize};
use super::KnowledgeItem;

pub const DEFAULT_SEARCH_LIMIT: usize = 3;
pub const DEFAULT_MIN_SCORE: f64 = 1.0;

/// Score at which a match is trusted enough to answer on its own.
pub const STRONG_MATCH_SCORE: f64 = 4.0;

const KEYWORD_POINTS: f64 = 3.0;
const QUESTION_POINTS: f64 = 1.0;
const ANSWER_POINTS: f64 = 0.5;
const ANSWER_CAP: f64 = 2.0;
const CATEGORY_POINTS: f64 = 1.5;
const PREFIX_MATCH_MIN_LEN: usize = 4;

/// Search tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub limit: usize,
    pub min_score: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl SearchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// A scored search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeMatch {
    pub item: KnowledgeItem,
    pub score: f64,
    pub matched_keywords: Vec<String>,
}

impl KnowledgeMatch {
    pub fn is_strong(&self) -> bool {
        self.score >= STRONG_MATCH_SCORE
    }
}

/// Ranks active items against a guest message.
///
/// Returns at most `options.limit` matches with score at least
/// `options.min_score`, best first.
pub fn search_knowledge_base(
    items: &[KnowledgeItem],
    message: &str,
    options: SearchOptions,
) -> Vec<KnowledgeMatch> {
    let tokens = tokenize(message);
    if tokens.is_empty() || options.limit == 0 {
        return Vec::new();
    }
    let distinct: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
    let lowered = message.to_lowercase();

    let mut matches: Vec<KnowledgeMatch> = items
        .iter()
        .filter(|item| item.active)
        .filter_map(|item| {
            let (score, matched_keywords) = score_item(item, &distinct, &lowered);
            (score >= options.min_score).then(|| KnowledgeMatch {
                item: item.clone(),
                score,
                matched_keywords,
            })
        })
        .collect();

    matches.sort_by(rank);
    matches.truncate(options.limit);
    matches
}

fn score_item(item: &KnowledgeItem, tokens: &BTreeSet<&str>, lowered: &str) -> (f64, Vec<String>) {
    let matched_keywords: Vec<String> = item
        .keywords
        .iter()
        .filter(|k| keyword_matches(k, tokens, lowered))
        .cloned()
        .collect();
    let mut score = matched_keywords.len() as f64 * KEYWORD_POINTS;

    let question = token_set(&item.question);
    score += tokens.iter().filter(|t| question.contains(**t)).count() as f64 * QUESTION_POINTS;

    let answer = token_set(&item.answer);
    let answer_hits = tokens.iter().filter(|t| answer.contains(**t)).count() as f64;
    score += (answer_hits * ANSWER_POINTS).min(ANSWER_CAP);

    if let Some(category) = item.category.as_deref() {
        let category = category.trim().to_lowercase();
        if tokens.contains(category.as_str()) {
            score += CATEGORY_POINTS;
        }
    }

    (score, matched_keywords)
}

fn keyword_matches(keyword: &str, tokens: &BTreeSet<&str>, lowered: &str) -> bool {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return false;
    }
    if keyword.chars().any(|c| !c.is_alphanumeric()) {
        return lowered.contains(keyword);
    }
    tokens.iter().any(|t| {
        *t == keyword || (keyword.chars().count() >= PREFIX_MATCH_MIN_LEN && t.starts_with(keyword))
    })
}

fn rank(a: &KnowledgeMatch, b: &KnowledgeMatch) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.item.priority.cmp(&a.item.priority))
        .then_with(|| b.item.usage_count.cmp(&a.item.usage_count))
        .then_with(|| a.item.question.cmp(&b.item.question))
}
