//! Knowledge base management for the dashboard.

mod errors;
mod manage_items;
mod search_items;

pub use errors::KnowledgeError;
pub use manage_items::{
    CreateKnowledgeCommand, CreateKnowledgeHandler, DeleteKnowledgeCommand, DeleteKnowledgeHandler,
    ListKnowledgeHandler, UpdateKnowledgeCommand, UpdateKnowledgeHandler,
};
pub use search_items::{SearchKnowledgeHandler, SearchKnowledgeQuery, MAX_SEARCH_RESULTS};
