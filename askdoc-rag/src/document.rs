//! Data types for documents, chunks, and search results.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// A source document containing text content and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
    /// Optional URI pointing to the original source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

impl Document {
    /// Load a document from a UTF-8 text file.
    ///
    /// The document id is the file stem (`notes` for `notes.txt`), so
    /// re-ingesting the same file replaces its chunks rather than
    /// accumulating duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::SourceNotFound`] if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RagError::SourceNotFound {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("document")
            .to_string();

        Ok(Self {
            id,
            text,
            metadata: HashMap::new(),
            source_uri: Some(path.display().to_string()),
        })
    }
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk, `{document_id}_{chunk_index}`.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Key-value metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_loads_text_and_derives_id_from_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.txt");
        std::fs::write(&path, "First sentence. Second sentence.").unwrap();

        let document = Document::from_path(&path).unwrap();

        assert_eq!(document.id, "guide");
        assert_eq!(document.text, "First sentence. Second sentence.");
        assert_eq!(document.source_uri.as_deref(), Some(path.display().to_string().as_str()));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = Document::from_path("/definitely/not/here.txt").unwrap_err();

        match err {
            RagError::SourceNotFound { path, .. } => {
                assert!(path.contains("not/here.txt"));
            }
            other => panic!("expected SourceNotFound, got {other:?}"),
        }
    }
}
