//! Mock AI Provider for testing.
//!
//! Queued replies or errors are returned in order; once the queue is empty
//! every call gets a default reply. Calls are recorded for verification.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("Check-in starts at 3 PM.")
//!     .with_error(AIError::Unavailable("down".into()));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

const DEFAULT_REPLY: &str = "Happy to help with that.";

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    responses: Arc<Mutex<VecDeque<Result<String, AIError>>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    info: ProviderInfo,
    delay: Duration,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            info: ProviderInfo::new("mock", "mock-model-1", 128_000),
            delay: Duration::ZERO,
        }
    }

    /// Queues a successful reply.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(Ok(content.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: AIError) -> Self {
        self.push(Err(error));
        self
    }

    /// Provider that fails every call with `error`.
    pub fn failing(error: AIError) -> FailingMock {
        FailingMock { error }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.info.name = name.to_string();
        self
    }

    /// Simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Requests received so far, in call order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn push(&self, entry: Result<String, AIError>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(entry);
        }
    }

    fn next(&self) -> Result<String, AIError> {
        self.responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let content = self.next()?;
        let prompt_tokens = request
            .messages
            .iter()
            .map(|m| self.estimate_tokens(&m.content))
            .sum::<u32>()
            + request
                .system_prompt
                .as_deref()
                .map(|p| self.estimate_tokens(p))
                .unwrap_or(0);

        Ok(CompletionResponse {
            usage: TokenUsage::new(prompt_tokens, self.estimate_tokens(&content)),
            model: request.model_or(&self.info.model).to_string(),
            content,
            finish_reason: FinishReason::Stop,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

/// Provider whose every call fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingMock {
    error: AIError,
}

#[async_trait]
impl AIProvider for FailingMock {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(self.error.clone())
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("failing-mock", "none", 0)
    }
}
