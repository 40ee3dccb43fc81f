//! # askdoc-model
//!
//! Language model clients for askdoc answer generation.
//!
//! ## Overview
//!
//! This crate provides the [`LanguageModel`] trait and its implementations:
//!
//! - [`OllamaModel`] - local models served by Ollama (`mistral`, `llama3`, etc.)
//! - [`MockLlm`] - canned-response model for testing
//!
//! A [`CompletionRequest`] carries the prompt plus an optional system
//! instruction; [`LanguageModel::generate`] turns it into a single completed
//! string. Streaming is intentionally out of scope.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use askdoc_model::{CompletionRequest, LanguageModel, OllamaModel};
//!
//! let model = OllamaModel::new()?.with_model("mistral");
//! let request = CompletionRequest::new("What is the capital of France?")
//!     .with_system("Answer in one word.");
//! let text = model.generate(request).await?;
//! ```

pub mod error;
pub mod mock;
pub mod model;
pub mod ollama;

pub use error::{ModelError, Result};
pub use mock::MockLlm;
pub use model::{CompletionRequest, LanguageModel};
pub use ollama::OllamaModel;
