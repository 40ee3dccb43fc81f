//! Adaptive chunk-size estimation from sentence statistics.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RagError, Result};

/// Chunking parameters derived from a document's sentence statistics.
///
/// Invariant: `chunk_size >= 1` and `chunk_overlap < chunk_size`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingParams {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
}

impl ChunkingParams {
    /// Derive chunking parameters from a document's sentences.
    ///
    /// The average sentence length (in characters) is scaled by
    /// `size_multiplier` for the chunk size and by `overlap_ratio` for the
    /// overlap; both results are floored. If the floors collide, the overlap
    /// is clamped to `chunk_size - 1` so chunking always makes progress.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyDocument`] for an empty sentence list and
    /// [`RagError::ChunkingError`] if the derived chunk size floors to zero.
    pub fn estimate(
        sentences: &[&str],
        size_multiplier: f64,
        overlap_ratio: f64,
    ) -> Result<Self> {
        if sentences.is_empty() {
            return Err(RagError::EmptyDocument);
        }

        let total: usize = sentences.iter().map(|s| s.chars().count()).sum();
        let average = total as f64 / sentences.len() as f64;

        let chunk_size = (average * size_multiplier) as usize;
        if chunk_size == 0 {
            return Err(RagError::ChunkingError(format!(
                "derived chunk_size is zero (average sentence length {average:.1}, \
                 multiplier {size_multiplier})"
            )));
        }

        let mut chunk_overlap = (average * overlap_ratio) as usize;
        if chunk_overlap >= chunk_size {
            debug!(chunk_size, chunk_overlap, "clamping overlap below chunk size");
            chunk_overlap = chunk_size - 1;
        }

        Ok(Self { chunk_size, chunk_overlap })
    }
}
