//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary shared by every tenant-facing module.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{BusinessId, ConversationId, GuestId, KnowledgeItemId, MessageId, TouchpointId, UserId};
pub use timestamp::Timestamp;
