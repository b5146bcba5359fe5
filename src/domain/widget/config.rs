//! Widget appearance and embed snippet.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::business::BusinessProfile;
use crate::domain::foundation::{BusinessId, ValidationError};
use crate::domain::tier::{TierFeature, TierFeatures};

pub const DEFAULT_PRIMARY_COLOR: &str = "#2563EB";

const MAX_TEXT_CHARS: usize = 200;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid")
});

/// Screen corner for the launcher button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
}

impl WidgetPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetPosition::BottomRight => "bottom_right",
            WidgetPosition::BottomLeft => "bottom_left",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bottom_right" => Some(WidgetPosition::BottomRight),
            "bottom_left" => Some(WidgetPosition::BottomLeft),
            _ => None,
        }
    }
}

/// Per-business widget settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub business_id: BusinessId,
    pub primary_color: String,
    pub position: WidgetPosition,
    pub greeting: String,
    pub placeholder: String,
    pub launcher_label: String,
    pub show_branding: bool,
}

impl WidgetConfig {
    /// Defaults derived from the business profile.
    pub fn default_for(business: &BusinessProfile) -> Self {
        Self {
            business_id: business.id,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            position: WidgetPosition::default(),
            greeting: format!(
                "Hi! I'm the virtual concierge for {}. How can I help?",
                business.name
            ),
            placeholder: "Ask about rooms, amenities or bookings...".to_string(),
            launcher_label: "Chat with us".to_string(),
            show_branding: true,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !HEX_COLOR.is_match(&self.primary_color) {
            return Err(ValidationError::invalid_format(
                "primary_color",
                "expected #RRGGBB",
            ));
        }
        for (field, value) in [
            ("greeting", &self.greeting),
            ("placeholder", &self.placeholder),
            ("launcher_label", &self.launcher_label),
        ] {
            let len = value.trim().chars().count();
            if len == 0 {
                return Err(ValidationError::empty_field(field));
            }
            if len > MAX_TEXT_CHARS {
                return Err(ValidationError::out_of_range(
                    field,
                    1,
                    MAX_TEXT_CHARS as i64,
                    len as i64,
                ));
            }
        }
        Ok(())
    }

    /// Settings as served to the widget; branding can only be hidden on
    /// tiers that allow it.
    pub fn effective(&self, features: &TierFeatures) -> Self {
        let mut out = self.clone();
        if !features.has(TierFeature::RemoveBranding) {
            out.show_branding = true;
        }
        out
    }

    /// Renders the `<script>` snippet a business pastes into its site.
    pub fn embed_code(&self, script_url: &str, api_base_url: &str) -> String {
        format!(
            concat!(
                "<script src=\"{src}\" async ",
                "data-business-id=\"{id}\" ",
                "data-api-base=\"{api}\" ",
                "data-color=\"{color}\" ",
                "data-position=\"{position}\" ",
                "data-greeting=\"{greeting}\" ",
                "data-placeholder=\"{placeholder}\" ",
                "data-label=\"{label}\" ",
                "data-branding=\"{branding}\"></script>"
            ),
            src = escape_attr(script_url),
            id = self.business_id,
            api = escape_attr(api_base_url.trim_end_matches('/')),
            color = escape_attr(&self.primary_color),
            position = self.position.as_str(),
            greeting = escape_attr(&self.greeting),
            placeholder = escape_attr(&self.placeholder),
            label = escape_attr(&self.launcher_label),
            branding = self.show_branding,
        )
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::business::BusinessType;
    use crate::domain::tier::Tier;

    fn business(tier: Tier) -> BusinessProfile {
        BusinessProfile::new("Casa Azul", BusinessType::Hotel, tier).unwrap()
    }

    #[test]
    fn default_greeting_names_business() {
        let config = WidgetConfig::default_for(&business(Tier::Starter));
        assert_eq!(
            config.greeting,
            "Hi! I'm the virtual concierge for Casa Azul. How can I help?"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_colors() {
        let mut config = WidgetConfig::default_for(&business(Tier::Starter));
        for bad in ["blue", "#12345", "#1234567", "#GGGGGG", "2563EB"] {
            config.primary_color = bad.to_string();
            assert!(config.validate().is_err(), "{bad} should be rejected");
        }
        config.primary_color = "#a1b2c3".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_greeting() {
        let mut config = WidgetConfig::default_for(&business(Tier::Starter));
        config.greeting = "  ".to_string();
        assert_eq!(
            config.validate().unwrap_err(),
            ValidationError::empty_field("greeting")
        );
    }

    #[test]
    fn lower_tiers_always_show_branding() {
        for tier in [Tier::Starter, Tier::Professional] {
            let mut config = WidgetConfig::default_for(&business(tier));
            config.show_branding = false;
            let effective = config.effective(&TierFeatures::for_tier(tier));
            assert!(effective.show_branding);
        }
    }

    #[test]
    fn premium_may_hide_branding() {
        let mut config = WidgetConfig::default_for(&business(Tier::Premium));
        config.show_branding = false;
        let effective = config.effective(&TierFeatures::for_tier(Tier::Premium));
        assert!(!effective.show_branding);
    }

    #[test]
    fn embed_code_escapes_attributes() {
        let mut config = WidgetConfig::default_for(&business(Tier::Starter));
        config.greeting = "Welcome to \"Bed & Breakfast\" <3".to_string();
        let html = config.embed_code("https://cdn.example.com/widget.js", "https://api.example.com/");

        assert!(html.starts_with("<script src=\"https://cdn.example.com/widget.js\""));
        assert!(html.contains("data-api-base=\"https://api.example.com\""));
        assert!(html.contains("Welcome to &quot;Bed &amp; Breakfast&quot; &lt;3"));
        assert!(html.contains(&format!("data-business-id=\"{}\"", config.business_id)));
        assert!(html.ends_with("></script>"));
    }

    #[test]
    fn position_serializes_snake_case() {
        let json = serde_json::to_string(&WidgetPosition::BottomLeft).unwrap();
        assert_eq!(json, "\"bottom_left\"");
        assert_eq!(WidgetPosition::parse("bottom_left"), Some(WidgetPosition::BottomLeft));
    }
}
