//! Command and query handlers.
//!
//! Each handler depends only on port traits, so the same handler runs over
//! PostgreSQL in production and in-memory adapters in tests.

pub mod analytics;
pub mod chat;
pub mod knowledge;
pub mod widget;

pub use analytics::{
    AnalyticsError, FunnelReport, GapReport, GetFunnelHandler, GetFunnelQuery,
    GetGuestJourneyHandler, GetGuestJourneyQuery, GetKnowledgeGapsHandler, GetKnowledgeGapsQuery,
};
pub use chat::{
    ChatError, ChatSettings, GenerateResponseCommand, GenerateResponseHandler,
    GenerateResponseResult,
};
pub use knowledge::{
    CreateKnowledgeCommand, CreateKnowledgeHandler, DeleteKnowledgeCommand, DeleteKnowledgeHandler,
    KnowledgeError, ListKnowledgeHandler, SearchKnowledgeHandler, SearchKnowledgeQuery,
    UpdateKnowledgeCommand, UpdateKnowledgeHandler,
};
pub use widget::{
    EmbedCode, GetEmbedCodeHandler, GetWidgetConfigHandler, RecordEventCommand,
    RecordEventHandler, RecordEventResult, UpdateWidgetConfigCommand, UpdateWidgetConfigHandler,
    WidgetError,
};
