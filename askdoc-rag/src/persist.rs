//! File-backed vector store that survives restarts.
//!
//! [`PersistentVectorStore`] keeps chunks in memory like
//! [`InMemoryVectorStore`](crate::inmemory) but mirrors every mutation into
//! a JSON state file inside its data directory. The state records which
//! embedding model produced the vectors; opening the store with a different
//! model discards them, since scores across models are meaningless.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, cosine_similarity};

const STATE_FILE: &str = "chunks.json";
const STATE_VERSION: u32 = 1;

/// A vector store persisted as a JSON state file in a data directory.
///
/// # Example
///
/// ```rust,ignore
/// use askdoc_rag::{PersistentVectorStore, VectorStore};
///
/// let store = PersistentVectorStore::open("./askdoc_db", "all-minilm", 384).await?;
/// store.upsert(&chunks).await?;
/// ```
pub struct PersistentVectorStore {
    dir: PathBuf,
    model: String,
    dimensions: usize,
    chunks: RwLock<HashMap<String, Chunk>>,
}

impl PersistentVectorStore {
    /// Open (or create) a store in `dir` for embeddings produced by `model`.
    ///
    /// Loads the existing state file when present. If the stored model name
    /// or dimensionality differs from the requested ones, the store starts
    /// empty and logs a warning; the stale state is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] if the directory cannot be
    /// created or an existing state file cannot be read.
    pub async fn open(
        dir: impl Into<PathBuf>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| RagError::VectorStoreError {
            backend: "Persistent".into(),
            message: format!("cannot create data directory '{}': {e}", dir.display()),
        })?;

        let store = Self {
            dir,
            model: model.into(),
            dimensions,
            chunks: RwLock::new(HashMap::new()),
        };
        store.load().await?;
        Ok(store)
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    async fn load(&self) -> Result<()> {
        #[derive(Deserialize)]
        struct PersistedState {
            version: u32,
            model: String,
            dimensions: usize,
            chunks: HashMap<String, Chunk>,
        }

        let path = self.state_path();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(RagError::VectorStoreError {
                    backend: "Persistent".into(),
                    message: format!("cannot read state file '{}': {e}", path.display()),
                });
            }
        };

        match serde_json::from_str::<PersistedState>(&data) {
            Ok(state) if state.version != STATE_VERSION => {
                warn!(
                    version = state.version,
                    "state file has an unsupported version; starting empty"
                );
                self.save().await?;
            }
            Ok(state) if state.model != self.model || state.dimensions != self.dimensions => {
                warn!(
                    stored_model = %state.model,
                    stored_dimensions = state.dimensions,
                    requested_model = %self.model,
                    requested_dimensions = self.dimensions,
                    "stored embeddings were produced by a different embedding model; starting empty"
                );
                self.save().await?;
            }
            Ok(state) => {
                info!(
                    path = %path.display(),
                    chunk_count = state.chunks.len(),
                    "loaded vector store"
                );
                *self.chunks.write().await = state.chunks;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "state file is unreadable; starting empty");
                self.save().await?;
            }
        }

        Ok(())
    }

    async fn save(&self) -> Result<()> {
        #[derive(Serialize)]
        struct PersistedState<'a> {
            version: u32,
            model: &'a str,
            dimensions: usize,
            chunks: &'a HashMap<String, Chunk>,
        }

        let chunks = self.chunks.read().await;
        let state = PersistedState {
            version: STATE_VERSION,
            model: &self.model,
            dimensions: self.dimensions,
            chunks: &*chunks,
        };

        let data = serde_json::to_string(&state).map_err(|e| RagError::VectorStoreError {
            backend: "Persistent".into(),
            message: format!("cannot serialize state: {e}"),
        })?;

        // Temp file plus rename keeps the previous state intact if the
        // write fails partway.
        let tmp = self.dir.join(format!("{STATE_FILE}.tmp"));
        tokio::fs::write(&tmp, data).await.map_err(|e| RagError::VectorStoreError {
            backend: "Persistent".into(),
            message: format!("cannot write state file '{}': {e}", tmp.display()),
        })?;
        tokio::fs::rename(&tmp, self.state_path()).await.map_err(|e| {
            RagError::VectorStoreError {
                backend: "Persistent".into(),
                message: format!("cannot replace state file: {e}"),
            }
        })?;

        debug!(chunk_count = chunks.len(), "saved vector store");
        Ok(())
    }
}

#[async_trait]
impl VectorStore for PersistentVectorStore {
    async fn upsert(&self, chunks: &[Chunk]) -> Result<()> {
        {
            let mut store = self.chunks.write().await;
            for chunk in chunks {
                store.insert(chunk.id.clone(), chunk.clone());
            }
        }
        self.save().await
    }

    async fn delete_document(&self, document_id: &str) -> Result<usize> {
        let removed = {
            let mut store = self.chunks.write().await;
            let before = store.len();
            store.retain(|_, chunk| chunk.document_id != document_id);
            before - store.len()
        };

        if removed > 0 {
            self.save().await?;
        }
        Ok(removed)
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let store = self.chunks.read().await;

        let mut scored: Vec<SearchResult> = store
            .values()
            .map(|chunk| {
                let score = cosine_similarity(&chunk.embedding, embedding);
                SearchResult { chunk: chunk.clone(), score }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.chunks.read().await.len())
    }
}
