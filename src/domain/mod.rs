//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `tier` - Subscription tiers and the features they unlock
//! - `business` - Tenant profiles
//! - `knowledge` - Q&A knowledge base and keyword-overlap search
//! - `conversation` - Guest conversations and messages
//! - `assistant` - System prompt building and fallback replies
//! - `journey` - Funnel stage classification, guest journeys, funnel analytics
//! - `learning` - Knowledge gap detection from unanswered questions
//! - `widget` - Embeddable widget configuration

pub mod assistant;
pub mod business;
pub mod conversation;
pub mod foundation;
pub mod journey;
pub mod knowledge;
pub mod learning;
pub mod tier;
pub mod widget;
