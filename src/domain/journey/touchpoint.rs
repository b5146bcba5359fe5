//! Journey touchpoint entity.

use serde::{Deserialize, Serialize};

use super::{classify_event, classify_message, FunnelStage};
use crate::domain::foundation::{BusinessId, GuestId, Timestamp, TouchpointId, ValidationError};

/// What happened at a touchpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TouchpointKind {
    /// A guest chat message.
    Message { content: String },
    /// A widget event such as `booking_link_clicked`.
    Event { name: String },
}

impl TouchpointKind {
    pub fn is_message(&self) -> bool {
        matches!(self, TouchpointKind::Message { .. })
    }
}

/// A timestamped guest interaction, labeled with a funnel stage when recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Touchpoint {
    pub id: TouchpointId,
    pub business_id: BusinessId,
    pub guest_id: GuestId,
    pub occurred_at: Timestamp,
    pub kind: TouchpointKind,
    pub stage: FunnelStage,
}

impl Touchpoint {
    /// Records a guest message, classifying it by content.
    pub fn message(
        business_id: BusinessId,
        guest_id: GuestId,
        content: impl Into<String>,
        occurred_at: Timestamp,
    ) -> Self {
        let content = content.into();
        let stage = classify_message(&content);
        Self {
            id: TouchpointId::new(),
            business_id,
            guest_id,
            occurred_at,
            kind: TouchpointKind::Message { content },
            stage,
        }
    }

    /// Records a widget event, classifying it by name.
    pub fn event(
        business_id: BusinessId,
        guest_id: GuestId,
        name: &str,
        occurred_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            return Err(ValidationError::empty_field("event"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ValidationError::invalid_format(
                "event",
                "only letters, digits and underscores are allowed",
            ));
        }
        let stage = classify_event(&name);
        Ok(Self {
            id: TouchpointId::new(),
            business_id,
            guest_id,
            occurred_at,
            kind: TouchpointKind::Event { name },
            stage,
        })
    }
}
