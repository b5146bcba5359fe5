//! Conversation entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BusinessId, ConversationId, GuestId, Timestamp};

/// A guest's chat session with one business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    business_id: BusinessId,
    guest_id: GuestId,
    guest_name: Option<String>,
    language: Option<String>,
    started_at: Timestamp,
    last_message_at: Timestamp,
    message_count: u32,
}

impl Conversation {
    /// Starts a new conversation with no messages.
    pub fn start(
        business_id: BusinessId,
        guest_id: GuestId,
        guest_name: Option<String>,
        language: Option<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            business_id,
            guest_id,
            guest_name: clean(guest_name),
            language: clean(language).map(|l| l.to_lowercase()),
            started_at: now,
            last_message_at: now,
            message_count: 0,
        }
    }

    /// Reconstitutes a conversation from persistence.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ConversationId,
        business_id: BusinessId,
        guest_id: GuestId,
        guest_name: Option<String>,
        language: Option<String>,
        started_at: Timestamp,
        last_message_at: Timestamp,
        message_count: u32,
    ) -> Self {
        Self {
            id,
            business_id,
            guest_id,
            guest_name,
            language,
            started_at,
            last_message_at,
            message_count,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn business_id(&self) -> BusinessId {
        self.business_id
    }

    pub fn guest_id(&self) -> &GuestId {
        &self.guest_id
    }

    pub fn guest_name(&self) -> Option<&str> {
        self.guest_name.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn last_message_at(&self) -> Timestamp {
        self.last_message_at
    }

    pub fn message_count(&self) -> u32 {
        self.message_count
    }

    /// Returns true if this conversation belongs to the given business.
    pub fn belongs_to(&self, business_id: BusinessId) -> bool {
        self.business_id == business_id
    }

    // === Mutations ===

    /// Registers `added` new messages at `at`.
    pub fn touch(&mut self, added: u32, at: Timestamp) {
        self.message_count = self.message_count.saturating_add(added);
        if self.last_message_at.is_before(&at) {
            self.last_message_at = at;
        }
    }

    /// Fills in guest details learned mid-conversation; never clears them.
    pub fn update_guest(&mut self, guest_name: Option<String>, language: Option<String>) {
        if let Some(name) = clean(guest_name) {
            self.guest_name = Some(name);
        }
        if let Some(lang) = clean(language) {
            self.language = Some(lang.to_lowercase());
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation::start(
            BusinessId::new(),
            GuestId::new("guest-1").unwrap(),
            Some(" Ana ".to_string()),
            Some("ES".to_string()),
        )
    }

    #[test]
    fn start_normalizes_guest_details() {
        let c = conversation();
        assert_eq!(c.guest_name(), Some("Ana"));
        assert_eq!(c.language(), Some("es"));
        assert_eq!(c.message_count(), 0);
    }

    #[test]
    fn touch_counts_messages_and_advances_time() {
        let mut c = conversation();
        let later = c.started_at().plus_minutes(5);
        c.touch(2, later);
        assert_eq!(c.message_count(), 2);
        assert_eq!(c.last_message_at(), later);
    }

    #[test]
    fn touch_never_moves_time_backwards() {
        let mut c = conversation();
        let last = c.last_message_at();
        c.touch(1, last.minus_days(1));
        assert_eq!(c.last_message_at(), last);
    }

    #[test]
    fn update_guest_ignores_blank_values() {
        let mut c = conversation();
        c.update_guest(Some("  ".to_string()), None);
        assert_eq!(c.guest_name(), Some("Ana"));
        c.update_guest(Some("Ana Lima".to_string()), Some("PT".to_string()));
        assert_eq!(c.guest_name(), Some("Ana Lima"));
        assert_eq!(c.language(), Some("pt"));
    }

    #[test]
    fn belongs_to_checks_business() {
        let c = conversation();
        assert!(c.belongs_to(c.business_id()));
        assert!(!c.belongs_to(BusinessId::new()));
    }
}
