//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `BusinessRepository` - Tenant profiles and widget settings
//! - `KnowledgeRepository` - Q&A items, usage counters, unanswered questions
//! - `ConversationRepository` - Conversations, messages, quota counts
//! - `TouchpointRepository` - Journey touchpoints
//!
//! ## Service Ports
//!
//! - `AIProvider` - LLM completions
//! - `RateLimiter` - Fixed-window request limiting
//! - `SessionValidator` - Dashboard token validation

mod ai_provider;
mod business_repository;
mod conversation_repository;
mod knowledge_repository;
mod rate_limiter;
mod session_validator;
mod touchpoint_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use business_repository::BusinessRepository;
pub use conversation_repository::ConversationRepository;
pub use knowledge_repository::KnowledgeRepository;
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};
pub use session_validator::SessionValidator;
pub use touchpoint_repository::TouchpointRepository;
