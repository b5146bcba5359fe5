//! Chat-specific error types.

use thiserror::Error;

use crate::domain::foundation::{BusinessId, ConversationId, DomainError, ErrorCode, ValidationError};

/// Failures of the guest reply pipeline.
///
/// Provider errors never surface here; they degrade to a fallback reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Business not found: {0}")]
    BusinessNotFound(BusinessId),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("Monthly message limit of {limit} reached")]
    QuotaExceeded { limit: u32 },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl ChatError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ChatError::Validation(_) => ErrorCode::ValidationFailed,
            ChatError::BusinessNotFound(_) => ErrorCode::BusinessNotFound,
            ChatError::ConversationNotFound(_) => ErrorCode::ConversationNotFound,
            ChatError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            ChatError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for ChatError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => {
                ChatError::Validation(ValidationError::invalid_format("request", err.message))
            }
            _ => ChatError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_variants() {
        assert_eq!(
            ChatError::QuotaExceeded { limit: 500 }.code(),
            ErrorCode::QuotaExceeded
        );
        assert_eq!(
            ChatError::from(ValidationError::empty_field("message")).code(),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn database_errors_become_infrastructure() {
        let err = ChatError::from(DomainError::database("connection reset"));
        assert!(matches!(err, ChatError::Infrastructure(msg) if msg.contains("connection reset")));
    }

    #[test]
    fn quota_message_names_the_limit() {
        assert_eq!(
            ChatError::QuotaExceeded { limit: 2000 }.to_string(),
            "Monthly message limit of 2000 reached"
        );
    }
}
