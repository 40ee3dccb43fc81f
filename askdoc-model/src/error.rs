//! Error types for the `askdoc-model` crate.

use thiserror::Error;

/// Errors that can occur when calling a language model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The HTTP request could not be sent or its response could not be read.
    #[error("Model request failed ({provider}): {message}")]
    Http {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The model API returned a non-success status.
    #[error("Model API error ({provider}, status {status}): {message}")]
    Api {
        /// The model provider that produced the error.
        provider: String,
        /// The HTTP status code returned by the API.
        status: u16,
        /// The error detail reported by the API, or the raw body.
        message: String,
    },

    /// A client configuration error.
    #[error("Model configuration error: {0}")]
    Config(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
