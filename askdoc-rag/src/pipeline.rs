//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the full ingest-and-query workflow by
//! composing an [`EmbeddingProvider`], a [`VectorStore`], and a [`Chunker`].
//!
//! # Example
//!
//! ```rust,ignore
//! use askdoc_rag::{RagPipeline, RagConfig, InMemoryVectorStore};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! let chunks = pipeline.ingest(&document).await?;
//! let results = pipeline.query("search query").await?;
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::segment::sentences;
use crate::sizing::ChunkingParams;
use crate::vectorstore::VectorStore;

/// The RAG pipeline orchestrator.
///
/// Coordinates document ingestion (chunk → embed → store) and query
/// execution (embed → search → filter). Construct one via
/// [`RagPipeline::builder()`].
///
/// By default the pipeline sizes chunks per document, scaling the document's
/// average sentence length by the configured multiplier and overlap ratio.
/// Setting an explicit [`Chunker`] on the builder bypasses that derivation.
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .field("chunker", &self.chunker.as_ref().map(|_| "<dyn Chunker>"))
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Ingest a single document: chunk → embed → store.
    ///
    /// Any chunks from a previous ingest of the same document ID are replaced,
    /// so re-running ingestion is idempotent. Returns the chunks that were
    /// stored (with embeddings attached).
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyDocument`] if the document contains no
    /// sentences to size chunks from, and [`RagError::PipelineError`] if
    /// embedding or storage fails, including the document ID in the error
    /// message.
    pub async fn ingest(&self, document: &Document) -> Result<Vec<Chunk>> {
        // 1. Chunk the document, deriving parameters unless a chunker was set
        let mut chunks = match &self.chunker {
            Some(chunker) => chunker.chunk(document),
            None => {
                let sentences = sentences(&document.text);
                let params = ChunkingParams::estimate(
                    &sentences,
                    self.config.size_multiplier,
                    self.config.overlap_ratio,
                )
                .map_err(|e| {
                    error!(document.id = %document.id, error = %e, "cannot derive chunking parameters");
                    e
                })?;
                info!(
                    document.id = %document.id,
                    sentence_count = sentences.len(),
                    chunk_size = params.chunk_size,
                    chunk_overlap = params.chunk_overlap,
                    "derived chunking parameters"
                );
                RecursiveChunker::new(params.chunk_size, params.chunk_overlap).chunk(document)
            }
        };
        if chunks.is_empty() {
            info!(document.id = %document.id, chunk_count = 0, "ingested document (empty)");
            return Ok(chunks);
        }

        // 2. Collect chunk texts for batch embedding
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();

        // 3. Generate embeddings
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
            RagError::PipelineError(format!("embedding failed for document '{}': {e}", document.id))
        })?;

        // 4. Attach embeddings to chunks
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        // 5. Drop chunks left over from a previous ingest of this document
        let removed = self.vector_store.delete_document(&document.id).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "delete failed during ingestion");
            RagError::PipelineError(format!("delete failed for document '{}': {e}", document.id))
        })?;
        if removed > 0 {
            debug!(document.id = %document.id, removed, "replaced existing chunks");
        }

        // 6. Upsert into vector store
        self.vector_store.upsert(&chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during ingestion");
            RagError::PipelineError(format!("upsert failed for document '{}': {e}", document.id))
        })?;

        let chunk_count = chunks.len();
        info!(document.id = %document.id, chunk_count, "ingested document");

        Ok(chunks)
    }

    /// Query the pipeline: embed → search → filter by threshold.
    ///
    /// Returns search results ordered by descending relevance score. Results
    /// below the configured `similarity_threshold` are filtered out.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or search fails.
    pub async fn query(&self, query: &str) -> Result<Vec<SearchResult>> {
        // 1. Embed the query
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;

        // 2. Search the vector store
        let results = self
            .vector_store
            .search(&query_embedding, self.config.top_k)
            .await
            .map_err(|e| {
                error!(error = %e, "vector store search failed");
                RagError::PipelineError(format!("search failed: {e}"))
            })?;

        // 3. Filter by similarity threshold
        let threshold = self.config.similarity_threshold;
        let filtered: Vec<SearchResult> =
            results.into_iter().filter(|r| r.score >= threshold).collect();

        info!(result_count = filtered.len(), "query completed");

        Ok(filtered)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields except `chunker` are required; when no chunker is set, the
/// pipeline derives chunk size and overlap from each document's average
/// sentence length. Call [`build()`](RagPipelineBuilder::build) to validate
/// and produce the pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = RagPipeline::builder()
///     .config(RagConfig::default())
///     .embedding_provider(Arc::new(embedder))
///     .vector_store(Arc::new(store))
///     .chunker(Arc::new(chunker))  // optional
///     .build()?;
/// ```
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set an explicit chunker, bypassing per-document parameter derivation.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;

        Ok(RagPipeline {
            config,
            embedding_provider,
            vector_store,
            chunker: self.chunker,
        })
    }
}
