//! Retrieval-augmented question answering.
//!
//! [`RetrievalQa`] sits on top of a [`RagPipeline`] and a
//! [`LanguageModel`]: each question is embedded, matched against the vector
//! store, and the retrieved chunks are stuffed into the model prompt as
//! context for the answer.

use std::sync::Arc;

use askdoc_model::{CompletionRequest, LanguageModel};
use tracing::{debug, info};

use crate::document::SearchResult;
use crate::error::Result;
use crate::pipeline::RagPipeline;

/// System prompt used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions \
     based on the provided context. If the context doesn't contain relevant information, say so.";

/// Separator placed between context chunks in the prompt.
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// An answer produced by [`RetrievalQa::answer`], together with the chunks
/// that were offered to the model as context.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The question as asked.
    pub question: String,
    /// The model's reply.
    pub text: String,
    /// Retrieved chunks that backed the answer, best match first.
    pub sources: Vec<SearchResult>,
}

/// A question-answering chain: retrieve, stuff, generate.
///
/// # Example
///
/// ```rust,ignore
/// use askdoc_rag::RetrievalQa;
/// use askdoc_model::OllamaModel;
///
/// let qa = RetrievalQa::new(pipeline, Arc::new(OllamaModel::new()?));
/// let answer = qa.answer("What is the document about?").await?;
/// println!("{}", answer.text);
/// ```
pub struct RetrievalQa {
    pipeline: RagPipeline,
    model: Arc<dyn LanguageModel>,
    system_prompt: String,
}

impl RetrievalQa {
    /// Create a chain over `pipeline` answering with `model`, using
    /// [`DEFAULT_SYSTEM_PROMPT`].
    pub fn new(pipeline: RagPipeline, model: Arc<dyn LanguageModel>) -> Self {
        Self { pipeline, model, system_prompt: DEFAULT_SYSTEM_PROMPT.to_string() }
    }

    /// Replace the system prompt sent with every completion request.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Return a reference to the underlying pipeline.
    pub fn pipeline(&self) -> &RagPipeline {
        &self.pipeline
    }

    /// Answer a question using retrieved chunks as context.
    ///
    /// When no chunk scores above the pipeline's similarity threshold the
    /// model is still asked, with an empty context; the default system
    /// prompt instructs it to say when the context falls short.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`](crate::RagError::PipelineError)
    /// if retrieval fails and
    /// [`RagError::GenerationError`](crate::RagError::GenerationError) if
    /// the model call fails.
    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let sources = self.pipeline.query(question).await?;
        if sources.is_empty() {
            debug!("no chunks above threshold; answering without context");
        }

        let context = sources
            .iter()
            .map(|r| r.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        let prompt = format!("Context:\n{context}\n\nQuestion: {question}");

        let request = CompletionRequest::new(prompt).with_system(self.system_prompt.clone());
        let text = self.model.generate(request).await?;

        info!(
            model = self.model.name(),
            source_count = sources.len(),
            "generated answer"
        );

        Ok(Answer { question: question.to_string(), text, sources })
    }
}
