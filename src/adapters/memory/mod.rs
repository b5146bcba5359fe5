//! In-memory repository adapters.
//!
//! Back the unit and integration tests, and the no-database development
//! mode. State lives behind `tokio::sync::RwLock` and is lost on restart.

mod business_repository;
mod conversation_repository;
mod knowledge_repository;
mod touchpoint_repository;

pub use business_repository::InMemoryBusinessRepository;
pub use conversation_repository::InMemoryConversationRepository;
pub use knowledge_repository::InMemoryKnowledgeRepository;
pub use touchpoint_repository::InMemoryTouchpointRepository;
