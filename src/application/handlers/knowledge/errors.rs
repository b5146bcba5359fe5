//! Knowledge-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, KnowledgeItemId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnowledgeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Knowledge item not found: {0}")]
    NotFound(KnowledgeItemId),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl KnowledgeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            KnowledgeError::Validation(_) => ErrorCode::ValidationFailed,
            KnowledgeError::NotFound(_) => ErrorCode::KnowledgeItemNotFound,
            KnowledgeError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Maps a repository error for an operation on `id`.
    pub(crate) fn for_item(id: KnowledgeItemId) -> impl Fn(DomainError) -> Self {
        move |err| match err.code {
            ErrorCode::KnowledgeItemNotFound => KnowledgeError::NotFound(id),
            _ => KnowledgeError::from(err),
        }
    }
}

impl From<DomainError> for KnowledgeError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => {
                KnowledgeError::Validation(ValidationError::invalid_format("item", err.message))
            }
            _ => KnowledgeError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_item_maps_to_not_found() {
        let id = KnowledgeItemId::new();
        let err = KnowledgeError::for_item(id)(DomainError::new(
            ErrorCode::KnowledgeItemNotFound,
            "gone",
        ));
        assert_eq!(err, KnowledgeError::NotFound(id));
        assert_eq!(err.code(), ErrorCode::KnowledgeItemNotFound);
    }

    #[test]
    fn other_errors_stay_infrastructure() {
        let err = KnowledgeError::for_item(KnowledgeItemId::new())(DomainError::database("boom"));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}
