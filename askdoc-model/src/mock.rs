//! A canned-response model for tests and offline development.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{CompletionRequest, LanguageModel};

/// A [`LanguageModel`] that returns a fixed response and records every
/// request it receives, so tests can assert on the prompts that reached it.
///
/// # Example
///
/// ```rust,ignore
/// use askdoc_model::{CompletionRequest, LanguageModel, MockLlm};
///
/// let model = MockLlm::new("canned answer");
/// let text = model.generate(CompletionRequest::new("anything")).await?;
/// assert_eq!(text, "canned answer");
/// assert_eq!(model.requests().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockLlm {
    response: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlm {
    /// Create a mock that answers every request with `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into(), requests: Mutex::new(Vec::new()) }
    }

    /// Return a copy of every request seen so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl LanguageModel for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        Ok(self.response.clone())
    }
}
