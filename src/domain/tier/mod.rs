//! Subscription tiers.
//!
//! A tier is a configuration lookup: it picks the AI model, prompt budget,
//! monthly message quota and which dashboard features a business can use.

mod features;
mod tier;

pub use features::{TierFeature, TierFeatures};
pub use tier::Tier;
