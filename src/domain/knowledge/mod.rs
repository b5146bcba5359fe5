//! Knowledge base: tenant-authored Q&A items and keyword-overlap retrieval.

mod item;
mod search;
mod text;

pub use item::{KnowledgeItem, KnowledgeItemDraft, UnansweredQuestion};
pub use search::{
    search_knowledge_base, KnowledgeMatch, SearchOptions, DEFAULT_MIN_SCORE, DEFAULT_SEARCH_LIMIT,
    STRONG_MATCH_SCORE,
};
pub use text::{is_stop_word, token_set, tokenize};
