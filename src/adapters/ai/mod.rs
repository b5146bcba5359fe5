//! AI provider adapters.

mod anthropic_provider;
mod failover_provider;
mod mock_provider;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use failover_provider::FailoverAIProvider;
pub use mock_provider::{FailingMock, MockAIProvider};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
