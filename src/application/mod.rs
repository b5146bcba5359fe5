//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (chat, knowledge edits, widget events) are separated from the
//! read-only analytics queries.

pub mod handlers;

pub use handlers::*;
