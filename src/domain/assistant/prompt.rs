//! Tier-keyed system prompt construction.
//!
//! | Section | Starter | Professional | Premium | Enterprise |
//! |---------|:-:|:-:|:-:|:-:|
//! | identity, core facts | x | x | x | x |
//! | amenities, policies, booking | | x | x | x |
//! | knowledge context | 2 | 3 | 5 | 8 |
//! | guest context | | | x | x |
//! | custom instructions | | | | x |

use crate::domain::business::BusinessProfile;
use crate::domain::knowledge::KnowledgeMatch;
use crate::domain::tier::{Tier, TierFeatures};

const GROUNDING_RULE: &str = "Never invent prices, availability, discounts or facts that are not \
listed above. If you are not sure, say so and point the guest to the team.";

/// What is known about the guest for this request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestContext {
    pub name: Option<String>,
    pub language: Option<String>,
}

/// Builds the system prompt for a business's assistant.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        business: &BusinessProfile,
        features: &TierFeatures,
        knowledge: &[KnowledgeMatch],
        guest: &GuestContext,
    ) -> String {
        let tier = features.tier;
        let mut sections: Vec<String> = vec![identity(business), core_facts(business)];

        if tier.at_least(Tier::Professional) {
            if let Some(section) = amenities_and_policies(business) {
                sections.push(section);
            }
            sections.push(booking_guidance(business));
        }

        if let Some(section) = knowledge_context(knowledge, features.kb_items_in_prompt) {
            sections.push(section);
        }

        if tier.at_least(Tier::Premium) {
            sections.push(guest_context(business, features, guest));
        }

        if features.custom_instructions {
            if let Some(instructions) = business.custom_instructions() {
                sections.push(format!("Additional instructions from the property:\n{}", instructions));
            }
        }

        sections.push(length_rule(tier).to_string());
        sections.push(GROUNDING_RULE.to_string());
        sections.join("\n\n")
    }
}

fn identity(business: &BusinessProfile) -> String {
    let mut text = format!(
        "You are the virtual concierge for {}, a {}. Be warm, professional and concise. \
Answer as a helpful member of the front-desk team.",
        business.name,
        business.business_type.describe()
    );
    if let Some(description) = business.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        text.push_str(&format!("\nAbout the property: {}", description));
    }
    text
}

fn core_facts(business: &BusinessProfile) -> String {
    let mut facts = Vec::new();
    if let Some(location) = business.location() {
        facts.push(format!("- Location: {}", location));
    }
    match (business.check_in_time(), business.check_out_time()) {
        (Some(check_in), Some(check_out)) => {
            facts.push(format!("- Check-in from {}, check-out by {}", check_in, check_out))
        }
        (Some(check_in), None) => facts.push(format!("- Check-in from {}", check_in)),
        (None, Some(check_out)) => facts.push(format!("- Check-out by {}", check_out)),
        (None, None) => {}
    }
    if let Some(phone) = business.contact_phone() {
        facts.push(format!("- Phone: {}", phone));
    }
    if let Some(email) = business.contact_email() {
        facts.push(format!("- Email: {}", email));
    }

    if facts.is_empty() {
        "Key facts: none provided. Refer detailed questions to the team.".to_string()
    } else {
        format!("Key facts:\n{}", facts.join("\n"))
    }
}

fn amenities_and_policies(business: &BusinessProfile) -> Option<String> {
    let amenities = business.listed_amenities();
    let policies = business.listed_policies();
    if amenities.is_empty() && policies.is_empty() {
        return None;
    }

    let mut text = String::new();
    if !amenities.is_empty() {
        text.push_str(&format!("Amenities: {}", amenities.join(", ")));
    }
    if !policies.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str("Policies:\n");
        text.push_str(
            &policies
                .iter()
                .map(|p| format!("- {}", p))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    Some(text)
}

fn booking_guidance(business: &BusinessProfile) -> String {
    match business.booking_url() {
        Some(url) => format!(
            "When a guest shows interest in staying, invite them to book directly at {}.",
            url
        ),
        None => "When a guest wants to book, offer to connect them with the team.".to_string(),
    }
}

fn knowledge_context(knowledge: &[KnowledgeMatch], max_items: usize) -> Option<String> {
    if knowledge.is_empty() || max_items == 0 {
        return None;
    }
    let pairs: Vec<String> = knowledge
        .iter()
        .take(max_items)
        .map(|m| format!("Q: {}\nA: {}", m.item.question, m.item.answer))
        .collect();
    Some(format!(
        "Relevant answers from the property's knowledge base:\n{}",
        pairs.join("\n\n")
    ))
}

fn guest_context(business: &BusinessProfile, features: &TierFeatures, guest: &GuestContext) -> String {
    let name = guest.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let language = guest
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let mut text = match name {
        Some(name) => format!("The guest's name is {}. Address them by name when natural.", name),
        None => "The guest has not shared their name.".to_string(),
    };
    match (features.multi_language, language) {
        (true, Some(language)) => text.push_str(&format!(
            "\nReply in the guest's language ({}).",
            language
        )),
        (true, None) => text.push_str("\nReply in the language the guest writes in."),
        (false, _) => text.push_str(&format!(
            "\nReply in {}.",
            business.default_language
        )),
    }
    text
}

fn length_rule(tier: Tier) -> &'static str {
    match tier {
        Tier::Starter => "Keep every reply to two or three sentences.",
        Tier::Professional => "Keep replies under 120 words.",
        Tier::Premium | Tier::Enterprise => "Keep replies under 180 words.",
    }
}
