//! SearchKnowledgeHandler - lets a dashboard user preview what the widget
//! would retrieve for a guest question.

use std::sync::Arc;

use super::KnowledgeError;
use crate::domain::foundation::{BusinessId, ValidationError};
use crate::domain::knowledge::{search_knowledge_base, KnowledgeMatch, SearchOptions};
use crate::ports::KnowledgeRepository;

pub const MAX_SEARCH_RESULTS: usize = 20;
const DEFAULT_RESULTS: usize = 5;

#[derive(Debug, Clone)]
pub struct SearchKnowledgeQuery {
    pub business_id: BusinessId,
    pub query: String,
    /// Defaults to 5, capped at [`MAX_SEARCH_RESULTS`].
    pub limit: Option<usize>,
}

pub struct SearchKnowledgeHandler {
    repository: Arc<dyn KnowledgeRepository>,
}

impl SearchKnowledgeHandler {
    pub fn new(repository: Arc<dyn KnowledgeRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: SearchKnowledgeQuery) -> Result<Vec<KnowledgeMatch>, KnowledgeError> {
        let text = query.query.trim();
        if text.is_empty() {
            return Err(ValidationError::empty_field("q").into());
        }
        let limit = query.limit.unwrap_or(DEFAULT_RESULTS).clamp(1, MAX_SEARCH_RESULTS);

        let items = self.repository.list_active(query.business_id).await?;
        Ok(search_knowledge_base(&items, text, SearchOptions::with_limit(limit)))
    }
}
