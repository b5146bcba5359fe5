//! Assistant reply construction: tier-keyed system prompts for the LLM and
//! canned fallback replies when the LLM is unavailable.

mod fallback;
mod prompt;

pub use fallback::{FallbackReply, FallbackResponder, Intent};
pub use prompt::{GuestContext, PromptBuilder};
