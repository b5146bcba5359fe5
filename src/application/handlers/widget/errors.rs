//! Widget-specific error types.

use thiserror::Error;

use crate::domain::foundation::{BusinessId, DomainError, ErrorCode, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Business not found: {0}")]
    BusinessNotFound(BusinessId),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl WidgetError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WidgetError::Validation(_) => ErrorCode::ValidationFailed,
            WidgetError::BusinessNotFound(_) => ErrorCode::BusinessNotFound,
            WidgetError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for WidgetError {
    fn from(err: DomainError) -> Self {
        WidgetError::Infrastructure(err.to_string())
    }
}
