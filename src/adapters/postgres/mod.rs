//! PostgreSQL adapters - sqlx implementations of the repository ports.
//!
//! Each repository maps query results into a `*Row` struct (`sqlx::FromRow`)
//! and converts it into the domain type with `TryFrom`, so malformed stored
//! values surface as `DomainError`s instead of panics.

mod business_repository;
mod conversation_repository;
mod knowledge_repository;
mod touchpoint_repository;

pub use business_repository::PostgresBusinessRepository;
pub use conversation_repository::PostgresConversationRepository;
pub use knowledge_repository::PostgresKnowledgeRepository;
pub use touchpoint_repository::PostgresTouchpointRepository;

use crate::domain::foundation::DomainError;

/// Maps a sqlx error into a database `DomainError` with context.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(format!("{}: {}", context, e))
}

/// Rejects a stored value that no longer parses.
pub(crate) fn corrupt(column: &'static str, value: impl std::fmt::Display) -> DomainError {
    DomainError::database(format!("Invalid stored {}: {}", column, value)).with_detail("column", column)
}
