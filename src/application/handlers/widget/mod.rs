//! Widget configuration, embed code and journey event intake.

mod errors;
mod get_config;
mod record_event;
mod update_config;

pub use errors::WidgetError;
pub use get_config::{EmbedCode, GetEmbedCodeHandler, GetWidgetConfigHandler};
pub use record_event::{RecordEventCommand, RecordEventHandler, RecordEventResult};
pub use update_config::{UpdateWidgetConfigCommand, UpdateWidgetConfigHandler};
