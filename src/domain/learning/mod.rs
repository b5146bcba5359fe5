//! Self-learning: turns unanswered guest questions into knowledge suggestions.

mod gaps;

pub use gaps::{detect_knowledge_gaps, GapOptions, KnowledgeGap, MAX_GAPS};
