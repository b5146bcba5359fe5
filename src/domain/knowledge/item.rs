//! Knowledge base item entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BusinessId, GuestId, KnowledgeItemId, Timestamp, ValidationError};

/// A tenant-authored Q&A record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: KnowledgeItemId,
    pub business_id: BusinessId,
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    /// Lowercase, trimmed, de-duplicated.
    pub keywords: Vec<String>,
    /// Tie-breaker when scores are equal; higher first.
    pub priority: i32,
    pub active: bool,
    pub usage_count: u32,
    pub last_used_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields a dashboard user provides when creating or editing an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItemDraft {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for KnowledgeItemDraft {
    fn default() -> Self {
        Self {
            question: String::new(),
            answer: String::new(),
            category: None,
            keywords: Vec::new(),
            priority: 0,
            active: default_active(),
        }
    }
}

impl KnowledgeItem {
    /// Creates a new item from a draft after validating it.
    pub fn create(business_id: BusinessId, draft: KnowledgeItemDraft) -> Result<Self, ValidationError> {
        let (question, answer) = validate_text(&draft)?;
        let now = Timestamp::now();

        Ok(Self {
            id: KnowledgeItemId::new(),
            business_id,
            question,
            answer,
            category: normalize_category(draft.category),
            keywords: normalize_keywords(draft.keywords),
            priority: draft.priority,
            active: draft.active,
            usage_count: 0,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces the editable fields, keeping identity and usage statistics.
    pub fn apply(&mut self, draft: KnowledgeItemDraft) -> Result<(), ValidationError> {
        let (question, answer) = validate_text(&draft)?;
        self.question = question;
        self.answer = answer;
        self.category = normalize_category(draft.category);
        self.keywords = normalize_keywords(draft.keywords);
        self.priority = draft.priority;
        self.active = draft.active;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Counts one more use of this item in a reply.
    pub fn record_usage(&mut self, at: Timestamp) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.last_used_at = Some(at);
    }
}

fn validate_text(draft: &KnowledgeItemDraft) -> Result<(String, String), ValidationError> {
    let question = draft.question.trim();
    if question.is_empty() {
        return Err(ValidationError::empty_field("question"));
    }
    let answer = draft.answer.trim();
    if answer.is_empty() {
        return Err(ValidationError::empty_field("answer"));
    }
    Ok((question.to_string(), answer.to_string()))
}

fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
}

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !out.contains(&keyword) {
            out.push(keyword);
        }
    }
    out
}

/// A guest question that no knowledge item matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnansweredQuestion {
    pub business_id: BusinessId,
    pub guest_id: Option<GuestId>,
    pub question: String,
    pub asked_at: Timestamp,
}

impl UnansweredQuestion {
    pub fn new(business_id: BusinessId, guest_id: Option<GuestId>, question: impl Into<String>) -> Self {
        Self {
            business_id,
            guest_id,
            question: question.into(),
            asked_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> KnowledgeItemDraft {
        KnowledgeItemDraft {
            question: " Is breakfast included? ".to_string(),
            answer: "Yes, from 7 to 10am.".to_string(),
            category: Some(" Amenities ".to_string()),
            keywords: vec!["Breakfast".into(), "breakfast ".into(), "".into(), "morning meal".into()],
            priority: 1,
            active: true,
        }
    }

    #[test]
    fn create_normalizes_fields() {
        let item = KnowledgeItem::create(BusinessId::new(), draft()).unwrap();
        assert_eq!(item.question, "Is breakfast included?");
        assert_eq!(item.category.as_deref(), Some("amenities"));
        assert_eq!(item.keywords, vec!["breakfast", "morning meal"]);
        assert_eq!(item.usage_count, 0);
        assert!(item.last_used_at.is_none());
    }

    #[test]
    fn create_rejects_empty_question() {
        let mut d = draft();
        d.question = "   ".to_string();
        let err = KnowledgeItem::create(BusinessId::new(), d).unwrap_err();
        assert_eq!(err, ValidationError::empty_field("question"));
    }

    #[test]
    fn create_rejects_empty_answer() {
        let mut d = draft();
        d.answer = String::new();
        let err = KnowledgeItem::create(BusinessId::new(), d).unwrap_err();
        assert_eq!(err, ValidationError::empty_field("answer"));
    }

    #[test]
    fn apply_keeps_identity_and_usage() {
        let mut item = KnowledgeItem::create(BusinessId::new(), draft()).unwrap();
        let id = item.id;
        item.record_usage(Timestamp::now());

        let mut d = draft();
        d.answer = "No, breakfast is extra.".to_string();
        item.apply(d).unwrap();

        assert_eq!(item.id, id);
        assert_eq!(item.usage_count, 1);
        assert_eq!(item.answer, "No, breakfast is extra.");
    }

    #[test]
    fn draft_defaults_to_active() {
        let d: KnowledgeItemDraft =
            serde_json::from_str(r#"{"question":"q","answer":"a"}"#).unwrap();
        assert!(d.active);
        assert_eq!(d.priority, 0);
        assert!(d.keywords.is_empty());
    }
}
