//! The language model trait and its request type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single completion request: an optional system instruction plus the
/// user-visible prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// System instruction steering the model's behavior, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// The prompt text to complete.
    pub prompt: String,
}

impl CompletionRequest {
    /// Create a request with a prompt and no system instruction.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { system: None, prompt: prompt.into() }
    }

    /// Attach a system instruction to the request.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A text-generation model behind a unified async interface.
///
/// Implementations wrap specific backends (Ollama, mock models for tests)
/// and turn a [`CompletionRequest`] into a single completed string.
///
/// # Example
///
/// ```rust,ignore
/// use askdoc_model::{CompletionRequest, LanguageModel, OllamaModel};
///
/// let model = OllamaModel::new()?;
/// let text = model.generate(CompletionRequest::new("Say hello.")).await?;
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// A short name identifying the model, used in logs.
    fn name(&self) -> &str;

    /// Generate a completion for the request.
    async fn generate(&self, request: CompletionRequest) -> Result<String>;
}
