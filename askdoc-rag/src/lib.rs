//! # askdoc-rag
//!
//! Retrieval-augmented generation over plain-text documents.
//!
//! ## Overview
//!
//! This crate implements the full ask-your-document workflow: split a
//! document into sentences, derive chunking parameters from their average
//! length, chunk recursively with overlap, embed the chunks, store the
//! vectors, and answer questions with a language model grounded in the
//! best-matching chunks.
//!
//! - [`Document`] / [`Chunk`] - the data model moving through the pipeline
//! - [`sentences`] / [`ChunkingParams`] - sentence split and adaptive sizing
//! - [`RecursiveChunker`] - separator-aware chunking with overlap
//! - [`OllamaEmbeddingProvider`] - embeddings via a local Ollama server
//! - [`InMemoryVectorStore`] / [`PersistentVectorStore`] - cosine-similarity stores
//! - [`RagPipeline`] - ingest and query orchestration
//! - [`RetrievalQa`] - retrieve, stuff, generate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use askdoc_model::OllamaModel;
//! use askdoc_rag::{Document, InMemoryVectorStore, OllamaEmbeddingProvider, RagConfig,
//!     RagPipeline, RetrievalQa};
//!
//! let document = Document::from_path("notes.txt")?;
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(OllamaEmbeddingProvider::new()?))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//! pipeline.ingest(&document).await?;
//!
//! let qa = RetrievalQa::new(pipeline, Arc::new(OllamaModel::new()?));
//! let answer = qa.answer("What is the document about?").await?;
//! println!("{}", answer.text);
//! ```
//!
//! ## Features
//!
//! - Chunk size and overlap adapted to each document's sentence statistics
//! - Character-based sizing, safe for multi-byte text
//! - Idempotent re-ingestion (chunks of a document are replaced, not duplicated)
//! - Optional on-disk persistence tied to the embedding model that produced
//!   the vectors

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod ollama;
pub mod persist;
pub mod pipeline;
pub mod qa;
pub mod segment;
pub mod sizing;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use ollama::OllamaEmbeddingProvider;
pub use persist::PersistentVectorStore;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use qa::{Answer, RetrievalQa, DEFAULT_SYSTEM_PROMPT};
pub use segment::sentences;
pub use sizing::ChunkingParams;
pub use vectorstore::VectorStore;
