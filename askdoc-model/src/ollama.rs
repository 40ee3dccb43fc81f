//! Ollama generation client using the `/api/generate` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::model::{CompletionRequest, LanguageModel};

/// The default base URL of a locally running Ollama server.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default generation model.
const DEFAULT_MODEL: &str = "mistral";

/// The default request timeout in seconds. Local models can take a while
/// to produce a full completion, so this is deliberately generous.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A [`LanguageModel`] backed by an Ollama server.
///
/// Calls `/api/generate` with `stream: false` so the completion arrives as
/// a single JSON object.
///
/// # Configuration
///
/// - `model` defaults to `mistral`.
/// - `base_url` defaults to `http://localhost:11434`.
/// - the request timeout defaults to 120 seconds.
///
/// # Example
///
/// ```rust,ignore
/// use askdoc_model::{CompletionRequest, LanguageModel, OllamaModel};
///
/// let model = OllamaModel::new()?.with_model("llama3");
/// let text = model.generate(CompletionRequest::new("Say hello.")).await?;
/// ```
pub struct OllamaModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaModel {
    /// Create a client with the default model, base URL, and timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
            ModelError::Config(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Set the model name (e.g. `llama3`, `mistral`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL of the Ollama server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── LanguageModel implementation ───────────────────────────────────

#[async_trait]
impl LanguageModel for OllamaModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: CompletionRequest) -> Result<String> {
        debug!(
            provider = "Ollama",
            model = %self.model,
            prompt_len = request.prompt.len(),
            "generating completion"
        );

        let request_body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
        };

        let url = format!("{}/api/generate", self.base_url);
        let response = self.client.post(&url).json(&request_body).send().await.map_err(|e| {
            error!(provider = "Ollama", error = %e, "request failed");
            ModelError::Http {
                provider: "Ollama".into(),
                message: format!("request failed: {e}"),
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);

            error!(provider = "Ollama", %status, "API error");
            return Err(ModelError::Api {
                provider: "Ollama".into(),
                status: status.as_u16(),
                message: detail,
            });
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = "Ollama", error = %e, "failed to parse response");
            ModelError::Http {
                provider: "Ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(generate_response.response)
    }
}
