//! Recursive document chunking.
//!
//! [`RecursiveChunker`] splits hierarchically by paragraphs, lines, then
//! words, merging small pieces back together up to the chunk size and
//! carrying a configurable overlap between consecutive chunks.

use std::collections::VecDeque;

use crate::document::{Chunk, Document};

/// Separator ladder, coarsest first. Text that cannot be split at any of
/// these levels falls back to raw character windows.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no
/// embeddings. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no text to chunk.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text hierarchically: paragraphs, lines, words, then characters.
///
/// Separators stay attached to the preceding piece, so chunks cover the
/// document in order with no dropped content. Pieces are merged greedily up
/// to `chunk_size` characters; when a chunk is flushed, a trailing run of
/// pieces totalling at most `chunk_overlap` characters seeds the next chunk.
/// All sizes are measured in characters, never bytes.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk
/// inherits the parent document's metadata plus a `chunk_index` field.
///
/// # Example
///
/// ```rust,ignore
/// use askdoc_rag::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(512, 100);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - number of overlapping characters between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split text by the first applicable separator, recursing into segments
/// that are still too large, and merge what fits.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size || separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining_separators = &separators[1..];

    let mut chunks = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for segment in split_keeping_separator(text, separator) {
        if char_len(segment) <= chunk_size {
            pending.push(segment);
        } else {
            // Flush the merged run before descending into the long segment;
            // its sub-chunks are kept as-is.
            if !pending.is_empty() {
                chunks.extend(merge_segments(&pending, chunk_size, chunk_overlap));
                pending.clear();
            }
            chunks.extend(split_and_merge(
                segment,
                chunk_size,
                chunk_overlap,
                remaining_separators,
            ));
        }
    }

    if !pending.is_empty() {
        chunks.extend(merge_segments(&pending, chunk_size, chunk_overlap));
    }

    chunks
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment, so the segments concatenate back to the input.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Greedily merge consecutive segments into chunks of at most `chunk_size`
/// characters, seeding each new chunk with a trailing run of at most
/// `chunk_overlap` characters from the previous one.
fn merge_segments(segments: &[&str], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut window_len = 0usize;

    for &segment in segments {
        let segment_len = char_len(segment);
        if window_len + segment_len > chunk_size && !window.is_empty() {
            push_merged(&mut chunks, &window);
            // Retain the overlap tail, dropping further if the incoming
            // segment still would not fit next to it.
            while window_len > chunk_overlap
                || (window_len + segment_len > chunk_size && window_len > 0)
            {
                match window.pop_front() {
                    Some(dropped) => window_len -= char_len(dropped),
                    None => break,
                }
            }
        }
        window.push_back(segment);
        window_len += segment_len;
    }

    push_merged(&mut chunks, &window);
    chunks
}

fn push_merged(chunks: &mut Vec<String>, window: &VecDeque<&str>) {
    let merged: String = window.iter().copied().collect();
    let merged = merged.trim();
    if !merged.is_empty() {
        chunks.push(merged.to_string());
    }
}

/// Character windows of at most `chunk_size` characters, stepping by
/// `chunk_size - chunk_overlap`. The last resort when no separator applies;
/// splits on character boundaries, so multi-byte text is safe.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(chunk_overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(chars.len());
        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let raw_chunks =
            split_and_merge(&document.text, self.chunk_size, self.chunk_overlap, &SEPARATORS);

        raw_chunks
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), i.to_string());
                Chunk {
                    id: format!("{}_{i}", document.id),
                    text,
                    embedding: Vec::new(),
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn doc(text: &str) -> Document {
        Document {
            id: "doc".to_string(),
            text: text.to_string(),
            metadata: HashMap::new(),
            source_uri: None,
        }
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = RecursiveChunker::new(64, 8).chunk(&doc("short text"));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short text");
        assert_eq!(chunks[0].id, "doc_0");
        assert_eq!(chunks[0].metadata.get("chunk_index").map(String::as_str), Some("0"));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(RecursiveChunker::new(64, 8).chunk(&doc("")).is_empty());
    }

    #[test]
    fn words_merge_with_overlap_between_chunks() {
        let chunks = RecursiveChunker::new(6, 3).chunk(&doc("aa bb cc dd ee"));

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["aa bb", "bb cc", "cc dd", "dd ee"]);
    }

    #[test]
    fn paragraph_boundaries_are_preferred() {
        let chunks =
            RecursiveChunker::new(20, 0).chunk(&doc("First paragraph.\n\nSecond paragraph."));

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn indivisible_word_falls_back_to_character_windows() {
        let chunks = RecursiveChunker::new(8, 2).chunk(&doc("supercalifragilistic"));

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["supercal", "alifragi", "gilistic"]);
    }

    #[test]
    fn chunk_sizes_are_bounded_in_characters() {
        let text = "Greeks wrote αβγδεζηθικλμ without spaces sometimes.\n\n\
                    A second paragraph follows with more ordinary words here.";
        let chunker = RecursiveChunker::new(24, 6);

        for chunk in chunker.chunk(&doc(text)) {
            assert!(
                chunk.text.chars().count() <= 24,
                "chunk too large: {:?}",
                chunk.text
            );
        }
    }

    #[test]
    fn multibyte_text_splits_on_character_boundaries() {
        let chunks = RecursiveChunker::new(5, 1).chunk(&doc("αβγδεζηθικλμ"));

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["αβγδε", "εζηθι", "ικλμ"]);
    }

    #[test]
    fn chunks_cover_the_document_in_order_without_gaps() {
        let text = "The first sentence sets the scene. The second continues it.\n\
                    A new line brings another thought. More words follow here.\n\n\
                    The final paragraph wraps everything up neatly at the end.";
        let chunks = RecursiveChunker::new(40, 10).chunk(&doc(text));
        assert!(chunks.len() > 1);

        // Each chunk is a contiguous slice of the source; consecutive chunks
        // either overlap or are separated only by whitespace.
        let mut search_from = 0;
        let mut prev_end = 0;
        for chunk in &chunks {
            let start = search_from
                + text[search_from..]
                    .find(&chunk.text)
                    .unwrap_or_else(|| panic!("chunk not found in source: {:?}", chunk.text));
            if start > prev_end {
                assert!(
                    text[prev_end..start].trim().is_empty(),
                    "gap between chunks: {:?}",
                    &text[prev_end..start]
                );
            }
            prev_end = start + chunk.text.len();
            search_from = start;
        }
        // The last chunk reaches the end of the document text.
        assert!(text[prev_end..].trim().is_empty());
    }

    #[test]
    fn chunk_ids_and_indices_are_deterministic() {
        let chunker = RecursiveChunker::new(6, 3);
        let first = chunker.chunk(&doc("aa bb cc dd ee"));
        let second = chunker.chunk(&doc("aa bb cc dd ee"));

        assert_eq!(first, second);
        for (i, chunk) in first.iter().enumerate() {
            assert_eq!(chunk.id, format!("doc_{i}"));
            assert_eq!(chunk.document_id, "doc");
            assert_eq!(chunk.metadata.get("chunk_index"), Some(&i.to_string()));
        }
    }
}
