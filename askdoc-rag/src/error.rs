//! Error types for the `askdoc-rag` crate.

use askdoc_model::ModelError;
use thiserror::Error;

/// Errors that can occur while indexing or querying a document.
#[derive(Debug, Error)]
pub enum RagError {
    /// The document yielded no sentences to index.
    #[error("Document contains no sentences to index")]
    EmptyDocument,

    /// The document source could not be read.
    #[error("Cannot read document source '{path}': {message}")]
    SourceNotFound {
        /// The path that was requested.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred while deriving or applying chunking parameters.
    #[error("Chunking error: {0}")]
    ChunkingError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// An error from the answer-generation model.
    #[error(transparent)]
    GenerationError(#[from] ModelError),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
