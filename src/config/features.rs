//! Feature flags configuration

use serde::Deserialize;

/// Operator switches, independent of tenant tiers.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Call the LLM; when off every reply comes from templates
    #[serde(default = "enabled")]
    pub ai_responses: bool,

    /// Record journey touchpoints for chat messages and widget events
    #[serde(default = "enabled")]
    pub journey_tracking: bool,

    /// Record unanswered questions for knowledge gap detection
    #[serde(default = "enabled")]
    pub self_learning: bool,

    /// Show detailed error messages (disable in production!)
    #[serde(default)]
    pub verbose_errors: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            ai_responses: true,
            journey_tracking: true,
            self_learning: true,
            verbose_errors: false,
        }
    }
}

fn enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_flags_defaults() {
        let flags = FeatureFlags::default();
        assert!(flags.ai_responses);
        assert!(flags.journey_tracking);
        assert!(!flags.verbose_errors);
    }

    #[test]
    fn test_missing_fields_default_on() {
        let flags: FeatureFlags = serde_json::from_str(r#"{"verbose_errors": true}"#).unwrap();
        assert!(flags.ai_responses);
        assert!(flags.self_learning);
        assert!(flags.verbose_errors);
    }
}
