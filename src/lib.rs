//! Hospitality Bot - AI concierge backend for hotels and other stays.
//!
//! Serves an embeddable chat widget that answers guests with a tier-keyed
//! LLM prompt grounded in each business's knowledge base, falls back to canned
//! replies when the LLM is unavailable, and maps every guest interaction onto
//! a booking funnel for the tenant dashboard.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
