//! Failover AI Provider - tries a secondary provider when the primary fails.
//!
//! ```ignore
//! let provider = FailoverAIProvider::new(Arc::new(anthropic))
//!     .with_fallback(Arc::new(openai));
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper with automatic failover.
///
/// Every primary error except a content filter hit is retried once on the
/// fallback. A filtered reply would be filtered again elsewhere.
pub struct FailoverAIProvider {
    primary: Arc<dyn AIProvider>,
    fallback: Option<Arc<dyn AIProvider>>,
}

impl FailoverAIProvider {
    pub fn new(primary: Arc<dyn AIProvider>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn AIProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

#[async_trait]
impl AIProvider for FailoverAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let err = match self.primary.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        match &self.fallback {
            Some(fallback) if !matches!(err, AIError::ContentFiltered(_)) => {
                tracing::warn!(
                    business_id = %request.metadata.business_id,
                    conversation_id = %request.metadata.conversation_id,
                    primary = %self.primary.provider_info().name,
                    fallback = %fallback.provider_info().name,
                    error = %err,
                    "Primary AI provider failed, using fallback"
                );
                fallback.complete(request).await
            }
            _ => Err(err),
        }
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        self.primary.estimate_tokens(text)
    }

    fn provider_info(&self) -> ProviderInfo {
        self.primary.provider_info()
    }
}
