//! Embeddable chat widget configuration.

mod config;

pub use config::{WidgetConfig, WidgetPosition, DEFAULT_PRIMARY_COLOR};
