//! Subscription tier definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Subscription tier of a business.
///
/// Determines AI model choice, prompt richness and feature access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Entry plan: small model, short answers, core facts only.
    Starter,

    /// Adds amenities, booking guidance, history and journey analytics.
    Professional,

    /// Larger model, guest context, self-learning, multi-language.
    Premium,

    /// Everything, plus custom instructions and no message cap.
    Enterprise,
}

impl Tier {
    /// All tiers in ascending order.
    pub const ALL: [Tier; 4] = [
        Tier::Starter,
        Tier::Professional,
        Tier::Premium,
        Tier::Enterprise,
    ];

    /// Returns the wire name of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Starter => "starter",
            Tier::Professional => "professional",
            Tier::Premium => "premium",
            Tier::Enterprise => "enterprise",
        }
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Starter => "Starter",
            Tier::Professional => "Professional",
            Tier::Premium => "Premium",
            Tier::Enterprise => "Enterprise",
        }
    }

    /// Returns the numeric rank of this tier for comparison.
    ///
    /// Higher rank = more features.
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Starter => 0,
            Tier::Professional => 1,
            Tier::Premium => 2,
            Tier::Enterprise => 3,
        }
    }

    /// Returns true if this tier is at least `other`.
    pub fn at_least(&self, other: Tier) -> bool {
        self.rank() >= other.rank()
    }

    /// Returns true for the tiers that get enhanced fallback templates.
    pub fn uses_enhanced_templates(&self) -> bool {
        self.at_least(Tier::Premium)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starter" => Ok(Tier::Starter),
            "professional" => Ok(Tier::Professional),
            "premium" => Ok(Tier::Premium),
            "enterprise" => Ok(Tier::Enterprise),
            other => Err(ValidationError::invalid_format(
                "tier",
                format!("unknown tier '{}'", other),
            )),
        }
    }
}
