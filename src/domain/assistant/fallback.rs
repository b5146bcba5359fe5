//! Canned replies used when the LLM is unavailable.
//!
//! A strong knowledge base hit is returned verbatim. Otherwise the message is
//! matched against intent patterns and answered from a template. Premium and
//! enterprise templates add the booking link and a human-handoff line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::business::BusinessProfile;
use crate::domain::conversation::ReplySource;
use crate::domain::foundation::KnowledgeItemId;
use crate::domain::knowledge::KnowledgeMatch;
use crate::domain::tier::Tier;

/// What the guest seems to want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Booking,
    Pricing,
    CheckInOut,
    Amenities,
    Contact,
    Thanks,
    Greeting,
    General,
}

static INTENT_PATTERNS: Lazy<Vec<(Intent, Regex)>> = Lazy::new(|| {
    [
        (Intent::Booking, r"\b(book\w*|reserv\w*)\b"),
        (
            Intent::Pricing,
            r"\b(price\w*|rates?|costs?|how much|fees?|cheap\w*|discounts?|deals?)\b",
        ),
        (
            Intent::CheckInOut,
            r"\bcheck[\s-]?(in|out)\b|\b(arriv\w*|depart\w*)\b",
        ),
        (
            Intent::Amenities,
            r"\b(amenit\w*|pool|wi-?fi|internet|breakfast|parking|gym|spa|restaurant|bar|facilit\w*)\b",
        ),
        (
            Intent::Contact,
            r"\b(contact|phone|call|e-?mail|reach|speak to|talk to|human|staff)\b",
        ),
        (Intent::Thanks, r"\b(thanks?|thank you|thx|cheers|appreciate\w*)\b"),
        (
            Intent::Greeting,
            r"^\W*(hi|hello|hey|good (morning|afternoon|evening)|hola|bonjour)\b",
        ),
    ]
    .into_iter()
    .map(|(intent, pattern)| (intent, Regex::new(pattern).expect("valid intent regex")))
    .collect()
});

impl Intent {
    /// Detects the first matching intent, in priority order.
    pub fn detect(message: &str) -> Self {
        let lowered = message.to_lowercase();
        INTENT_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(&lowered))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::General)
    }

    /// The enhanced greeting invites bookings, so it carries the link.
    fn offers_booking_link(&self) -> bool {
        !matches!(self, Intent::Thanks | Intent::Contact)
    }

    /// Contact replies already are the handoff.
    fn offers_handoff(&self) -> bool {
        !matches!(self, Intent::Thanks | Intent::Greeting | Intent::Contact)
    }
}

/// A canned reply and how it was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackReply {
    pub text: String,
    pub source: ReplySource,
    /// None when a knowledge item answered directly.
    pub intent: Option<Intent>,
    pub knowledge_item_ids: Vec<KnowledgeItemId>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn new() -> Self {
        Self
    }

    pub fn respond(
        &self,
        business: &BusinessProfile,
        tier: Tier,
        message: &str,
        knowledge: &[KnowledgeMatch],
    ) -> FallbackReply {
        if let Some(top) = knowledge.first().filter(|m| m.is_strong()) {
            return FallbackReply {
                text: top.item.answer.clone(),
                source: ReplySource::KnowledgeBase,
                intent: None,
                knowledge_item_ids: vec![top.item.id],
            };
        }

        let intent = Intent::detect(message);
        let text = if tier.uses_enhanced_templates() {
            enhanced(intent, business)
        } else {
            basic(intent, business)
        };

        FallbackReply {
            text,
            source: ReplySource::Fallback,
            intent: Some(intent),
            knowledge_item_ids: Vec::new(),
        }
    }
}

fn basic(intent: Intent, business: &BusinessProfile) -> String {
    let name = &business.name;
    match intent {
        Intent::Booking => format!(
            "I'd love to help you plan your stay at {}. Our team can confirm availability and complete your reservation.",
            name
        ),
        Intent::Pricing => format!(
            "Rates at {} depend on your dates and room type, so I can't quote an exact price here. Our team can share current rates with you.",
            name
        ),
        Intent::CheckInOut => match (business.check_in_time(), business.check_out_time()) {
            (Some(check_in), Some(check_out)) => format!(
                "Check-in is from {} and check-out is by {}.",
                check_in, check_out
            ),
            (Some(check_in), None) => format!(
                "Check-in is from {}. Please confirm your check-out time with our team.",
                check_in
            ),
            (None, Some(check_out)) => format!(
                "Check-out is by {}. Please confirm your arrival time with our team.",
                check_out
            ),
            (None, None) => "Check-in and check-out times can vary, so please confirm them with our team before you arrive.".to_string(),
        },
        Intent::Amenities => {
            let amenities = business.listed_amenities();
            if amenities.is_empty() {
                format!(
                    "{} has a range of facilities for guests. Tell me what you're looking for and I'll do my best to help.",
                    name
                )
            } else {
                format!("{} offers {}.", name, join_human(&amenities))
            }
        }
        Intent::Contact => match business.contact_line() {
            Some(line) => format!("You can reach the team at {} directly: {}.", name, line),
            None => format!(
                "You can reach the team at {} through the contact details on our website.",
                name
            ),
        },
        Intent::Thanks => "You're welcome! Let me know if there's anything else I can help with.".to_string(),
        Intent::Greeting => format!("Hello and welcome to {}! How can I help you today?", name),
        Intent::General => format!(
            "Thanks for your question! I don't have that detail right now, but the team at {} will be happy to help.",
            name
        ),
    }
}

fn enhanced(intent: Intent, business: &BusinessProfile) -> String {
    let mut text = match intent {
        Intent::Greeting => format!(
            "Hello and welcome to {}! I'm your virtual concierge and can help with rooms, amenities, local tips and bookings. What can I do for you?",
            business.name
        ),
        Intent::Thanks => "You're very welcome! Enjoy your stay, and reach out any time you need something.".to_string(),
        _ => basic(intent, business),
    };

    if intent.offers_booking_link() {
        if let Some(url) = business.booking_url() {
            text.push_str(&format!(" You can also book online at {}.", url));
        }
    }
    if intent.offers_handoff() {
        if let Some(line) = business.contact_line() {
            text.push_str(&format!(" If you'd prefer to speak with someone, {}.", line));
        }
    }
    text
}

fn join_human(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::business::BusinessType;
    use crate::domain::foundation::BusinessId;
    use crate::domain::knowledge::{KnowledgeItem, KnowledgeItemDraft};

    fn business() -> BusinessProfile {
        let mut b = BusinessProfile::new("Maple Lodge", BusinessType::BedAndBreakfast, Tier::Starter).unwrap();
        b.check_in_time = Some("14:00".to_string());
        b.check_out_time = Some("10:30".to_string());
        b.contact_phone = Some("555-0100".to_string());
        b.booking_url = Some("https://maple.test/book".to_string());
        b.amenities = vec!["Free WiFi".into(), "Parking".into(), "Hot tub".into()];
        b
    }

    fn kb_match(score: f64) -> KnowledgeMatch {
        KnowledgeMatch {
            item: KnowledgeItem::create(
                BusinessId::new(),
                KnowledgeItemDraft {
                    question: "Do you allow pets?".into(),
                    answer: "Yes, well-behaved dogs are welcome.".into(),
                    ..Default::default()
                },
            )
            .unwrap(),
            score,
            matched_keywords: vec![],
        }
    }

    #[test]
    fn intents_are_detected_in_priority_order() {
        assert_eq!(Intent::detect("I want to book a room"), Intent::Booking);
        assert_eq!(Intent::detect("How much to reserve? what's the price"), Intent::Booking);
        assert_eq!(Intent::detect("What are your rates?"), Intent::Pricing);
        assert_eq!(Intent::detect("When is check-out?"), Intent::CheckInOut);
        assert_eq!(Intent::detect("Is there a pool"), Intent::Amenities);
        assert_eq!(Intent::detect("What's your phone number?"), Intent::Contact);
        assert_eq!(Intent::detect("Thank you so much"), Intent::Thanks);
        assert_eq!(Intent::detect("Hello there"), Intent::Greeting);
        assert_eq!(Intent::detect("Do you know a good tailor?"), Intent::General);
    }

    #[test]
    fn greeting_must_lead_the_message() {
        assert_eq!(Intent::detect("they said hi to me"), Intent::General);
    }

    #[test]
    fn strong_knowledge_match_is_returned_verbatim() {
        let reply = FallbackResponder::new().respond(&business(), Tier::Starter, "pets?", &[kb_match(4.0)]);
        assert_eq!(reply.text, "Yes, well-behaved dogs are welcome.");
        assert_eq!(reply.source, ReplySource::KnowledgeBase);
        assert_eq!(reply.knowledge_item_ids.len(), 1);
        assert!(reply.intent.is_none());
    }

    #[test]
    fn weak_match_falls_through_to_template() {
        let reply = FallbackResponder::new().respond(&business(), Tier::Starter, "hello", &[kb_match(3.5)]);
        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.intent, Some(Intent::Greeting));
        assert!(reply.knowledge_item_ids.is_empty());
    }

    #[test]
    fn basic_templates_use_business_facts() {
        let responder = FallbackResponder::new();
        let reply = responder.respond(&business(), Tier::Professional, "check in time?", &[]);
        assert_eq!(reply.text, "Check-in is from 14:00 and check-out is by 10:30.");

        let reply = responder.respond(&business(), Tier::Starter, "any amenities?", &[]);
        assert_eq!(reply.text, "Maple Lodge offers Free WiFi, Parking and Hot tub.");
    }

    #[test]
    fn basic_templates_omit_booking_link() {
        let reply = FallbackResponder::new().respond(&business(), Tier::Starter, "book please", &[]);
        assert!(!reply.text.contains("maple.test"));
    }

    #[test]
    fn enhanced_templates_add_link_and_handoff() {
        let reply = FallbackResponder::new().respond(&business(), Tier::Premium, "book please", &[]);
        assert!(reply.text.contains("book online at https://maple.test/book"));
        assert!(reply.text.contains("If you'd prefer to speak with someone, call 555-0100."));
    }

    #[test]
    fn enhanced_greeting_has_no_handoff() {
        let reply = FallbackResponder::new().respond(&business(), Tier::Enterprise, "hi!", &[]);
        assert!(reply.text.starts_with("Hello and welcome to Maple Lodge! I'm your virtual concierge"));
        assert!(!reply.text.contains("555-0100"));
    }

    #[test]
    fn enhanced_greeting_links_booking_but_contact_does_not() {
        let greeting = FallbackResponder::new().respond(&business(), Tier::Premium, "hello", &[]);
        assert!(greeting.text.contains("book online at https://maple.test/book"));

        let contact = FallbackResponder::new().respond(&business(), Tier::Premium, "can I talk to a human?", &[]);
        assert_eq!(contact.intent, Some(Intent::Contact));
        assert!(!contact.text.contains("book online"));
        assert_eq!(contact.text.matches("555-0100").count(), 1);
    }

    #[test]
    fn missing_fields_degrade_to_generic_wording() {
        let bare = BusinessProfile::new("Bare Inn", BusinessType::Hostel, Tier::Premium).unwrap();
        let responder = FallbackResponder::new();
        for message in ["book", "price", "check-in", "pool", "contact", "thanks", "hi", "weather?"] {
            let reply = responder.respond(&bare, Tier::Premium, message, &[]);
            assert!(!reply.text.is_empty());
            assert!(!reply.text.contains("{}"));
            assert!(!reply.text.contains("  "));
            assert!(!reply.text.contains(" ."));
        }
    }

    #[test]
    fn join_human_lists() {
        assert_eq!(join_human(&["a"]), "a");
        assert_eq!(join_human(&["a", "b"]), "a and b");
        assert_eq!(join_human(&["a", "b", "c"]), "a, b and c");
    }
}
