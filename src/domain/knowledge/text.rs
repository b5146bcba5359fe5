//! Text normalization shared by search and gap detection.

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "but", "if", "of", "at", "by", "for", "with", "about",
        "to", "from", "in", "on", "is", "are", "was", "were", "be", "been", "am", "do", "does",
        "did", "have", "has", "had", "can", "could", "would", "should", "will", "shall", "may",
        "might", "must", "i", "me", "my", "we", "our", "you", "your", "it", "its", "this",
        "that", "these", "those", "there", "here", "what", "which", "who", "whom", "when",
        "where", "why", "how", "any", "some", "so", "as", "than", "too", "very", "just", "not",
        "no", "yes", "please", "hi", "hello", "hey", "thanks", "thank", "us", "they", "them",
        "he", "she", "his", "her", "get", "got", "also", "into", "out", "up", "ok",
    ]
    .into_iter()
    .collect()
});

/// Returns true for English filler words ignored by matching.
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Lowercases, splits on non-alphanumerics and drops short and stop words.
///
/// Order is preserved and duplicates are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2 && !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Distinct tokens of `text` in sorted order.
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}
