//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::tier::{Tier, TierFeatures};

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub anthropic_api_key: Option<Secret<String>>,

    pub openai_api_key: Option<Secret<String>>,

    /// Primary AI provider
    #[serde(default)]
    pub primary_provider: AiProvider,

    /// Provider tried when the primary fails
    pub fallback_provider: Option<AiProvider>,

    /// OpenAI model used when the fallback provider answers
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Per-tier model overrides, keyed by tier name
    /// (`HOSPITALITY_BOT__AI__TIER_MODELS__PREMIUM=claude-...`)
    #[serde(default)]
    pub tier_models: HashMap<String, String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    #[default]
    Anthropic,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_openai(&self) -> bool {
        has_key(&self.openai_api_key)
    }

    pub fn has_anthropic(&self) -> bool {
        has_key(&self.anthropic_api_key)
    }

    /// True when no provider key is set; replies come from templates only.
    pub fn is_fallback_only(&self) -> bool {
        !self.has_openai() && !self.has_anthropic()
    }

    /// Tier features with the configured model override applied.
    pub fn features_for(&self, tier: Tier) -> TierFeatures {
        let features = TierFeatures::for_tier(tier);
        match self.tier_models.get(tier.as_str()) {
            Some(model) if !model.trim().is_empty() => features.with_model(model.trim()),
            _ => features,
        }
    }

    /// Validate AI configuration
    ///
    /// No keys at all is valid (template-only mode). Otherwise the primary
    /// provider must have a key.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for tier in self.tier_models.keys() {
            if tier.parse::<Tier>().is_err() {
                return Err(ValidationError::UnknownTierModel(tier.clone()));
            }
        }

        if self.is_fallback_only() {
            return Ok(());
        }

        match self.primary_provider {
            AiProvider::OpenAI if !self.has_openai() => {
                Err(ValidationError::PrimaryProviderWithoutKey("OPENAI_API_KEY"))
            }
            AiProvider::Anthropic if !self.has_anthropic() => {
                Err(ValidationError::PrimaryProviderWithoutKey("ANTHROPIC_API_KEY"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            openai_api_key: None,
            primary_provider: AiProvider::default(),
            fallback_provider: None,
            openai_model: default_openai_model(),
            tier_models: HashMap::new(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn has_key(key: &Option<Secret<String>>) -> bool {
    key.as_ref()
        .is_some_and(|k| !k.expose_secret().trim().is_empty())
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}
