//! Tier-based feature and AI budget configuration.

use serde::{Deserialize, Serialize};

use super::Tier;

/// Dashboard features that are gated by tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierFeature {
    JourneyAnalytics,
    SelfLearning,
    MultiLanguage,
    CustomInstructions,
    RemoveBranding,
}

impl TierFeature {
    /// Returns the wire name of this feature.
    pub fn as_str(&self) -> &'static str {
        match self {
            TierFeature::JourneyAnalytics => "journey_analytics",
            TierFeature::SelfLearning => "self_learning",
            TierFeature::MultiLanguage => "multi_language",
            TierFeature::CustomInstructions => "custom_instructions",
            TierFeature::RemoveBranding => "remove_branding",
        }
    }
}

/// What a tier gets: AI budget, prompt richness, quota and feature flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierFeatures {
    /// The tier these features apply to.
    pub tier: Tier,
    /// Default model identifier for AI replies.
    pub model: String,
    /// Maximum tokens in an AI reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Knowledge base items injected into the system prompt.
    pub kb_items_in_prompt: usize,
    /// Prior conversation messages sent with each request.
    pub history_messages: usize,
    /// Guest messages allowed per calendar month. None = unlimited.
    pub monthly_messages: Option<u32>,
    pub journey_analytics: bool,
    pub self_learning: bool,
    pub multi_language: bool,
    pub custom_instructions: bool,
    pub remove_branding: bool,
}

impl TierFeatures {
    /// Get the features for a specific tier.
    ///
    /// | Tier | Model | Tokens | KB | History | Messages/month |
    /// |------|-------|--------|----|---------|----------------|
    /// | Starter | claude-3-haiku | 300 | 2 | 0 | 500 |
    /// | Professional | claude-3.5-haiku | 500 | 3 | 6 | 2000 |
    /// | Premium | claude-sonnet-4 | 800 | 5 | 10 | 10000 |
    /// | Enterprise | claude-sonnet-4 | 1200 | 8 | 20 | Unlimited |
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::Starter => Self {
                tier,
                model: "claude-3-haiku-20240307".to_string(),
                max_tokens: 300,
                temperature: 0.7,
                kb_items_in_prompt: 2,
                history_messages: 0,
                monthly_messages: Some(500),
                journey_analytics: false,
                self_learning: false,
                multi_language: false,
                custom_instructions: false,
                remove_branding: false,
            },
            Tier::Professional => Self {
                tier,
                model: "claude-3-5-haiku-20241022".to_string(),
                max_tokens: 500,
                temperature: 0.7,
                kb_items_in_prompt: 3,
                history_messages: 6,
                monthly_messages: Some(2_000),
                journey_analytics: true,
                self_learning: false,
                multi_language: false,
                custom_instructions: false,
                remove_branding: false,
            },
            Tier::Premium => Self {
                tier,
                model: "claude-sonnet-4-20250514".to_string(),
                max_tokens: 800,
                temperature: 0.6,
                kb_items_in_prompt: 5,
                history_messages: 10,
                monthly_messages: Some(10_000),
                journey_analytics: true,
                self_learning: true,
                multi_language: true,
                custom_instructions: false,
                remove_branding: true,
            },
            Tier::Enterprise => Self {
                tier,
                model: "claude-sonnet-4-20250514".to_string(),
                max_tokens: 1200,
                temperature: 0.5,
                kb_items_in_prompt: 8,
                history_messages: 20,
                monthly_messages: None, // Unlimited
                journey_analytics: true,
                self_learning: true,
                multi_language: true,
                custom_instructions: true,
                remove_branding: true,
            },
        }
    }

    /// Replaces the default model, e.g. from `ai.tier_models` configuration.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Check if the monthly message quota has been reached.
    ///
    /// Returns false if unlimited or under limit.
    pub fn message_limit_reached(&self, sent_this_month: u32) -> bool {
        self.monthly_messages
            .map(|max| sent_this_month >= max)
            .unwrap_or(false)
    }

    /// Returns whether a gated feature is enabled for this tier.
    pub fn has(&self, feature: TierFeature) -> bool {
        match feature {
            TierFeature::JourneyAnalytics => self.journey_analytics,
            TierFeature::SelfLearning => self.self_learning,
            TierFeature::MultiLanguage => self.multi_language,
            TierFeature::CustomInstructions => self.custom_instructions,
            TierFeature::RemoveBranding => self.remove_branding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_uses_haiku_with_short_budget() {
        let f = TierFeatures::for_tier(Tier::Starter);
        assert_eq!(f.model, "claude-3-haiku-20240307");
        assert_eq!(f.max_tokens, 300);
        assert_eq!(f.kb_items_in_prompt, 2);
        assert_eq!(f.history_messages, 0);
    }

    #[test]
    fn starter_has_no_gated_features() {
        let f = TierFeatures::for_tier(Tier::Starter);
        assert!(!f.has(TierFeature::JourneyAnalytics));
        assert!(!f.has(TierFeature::SelfLearning));
        assert!(!f.has(TierFeature::RemoveBranding));
    }

    #[test]
    fn professional_gets_journey_analytics_only() {
        let f = TierFeatures::for_tier(Tier::Professional);
        assert!(f.has(TierFeature::JourneyAnalytics));
        assert!(!f.has(TierFeature::SelfLearning));
        assert!(!f.has(TierFeature::MultiLanguage));
    }

    #[test]
    fn premium_has_self_learning_but_not_custom_instructions() {
        let f = TierFeatures::for_tier(Tier::Premium);
        assert!(f.has(TierFeature::SelfLearning));
        assert!(f.has(TierFeature::MultiLanguage));
        assert!(!f.has(TierFeature::CustomInstructions));
        assert_eq!(f.temperature, 0.6);
    }

    #[test]
    fn enterprise_is_unlimited() {
        let f = TierFeatures::for_tier(Tier::Enterprise);
        assert_eq!(f.monthly_messages, None);
        assert!(!f.message_limit_reached(1_000_000));
        assert!(f.has(TierFeature::CustomInstructions));
    }

    #[test]
    fn message_limit_is_inclusive() {
        let f = TierFeatures::for_tier(Tier::Starter);
        assert!(!f.message_limit_reached(499));
        assert!(f.message_limit_reached(500));
        assert!(f.message_limit_reached(501));
    }

    #[test]
    fn budgets_grow_with_tier() {
        let budgets: Vec<u32> = Tier::ALL
            .iter()
            .map(|t| TierFeatures::for_tier(*t).max_tokens)
            .collect();
        assert!(budgets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn with_model_overrides_default() {
        let f = TierFeatures::for_tier(Tier::Premium).with_model("gpt-4o");
        assert_eq!(f.model, "gpt-4o");
        assert_eq!(f.tier, Tier::Premium);
    }
}
