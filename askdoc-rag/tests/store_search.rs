//! Search ordering and lifecycle tests for the in-memory vector store.

use std::collections::HashMap;

use askdoc_rag::document::Chunk;
use askdoc_rag::inmemory::InMemoryVectorStore;
use askdoc_rag::vectorstore::VectorStore;
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate a chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, text, embedding)| Chunk {
            id,
            text,
            embedding,
            metadata: HashMap::new(),
            document_id: "doc_1".to_string(),
        },
    )
}

fn chunk(id: &str, document_id: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: format!("text for {id}"),
        embedding,
        metadata: HashMap::new(),
        document_id: document_id.to_string(),
    }
}

/// For any set of stored chunks, search returns results ordered by
/// descending cosine similarity, bounded by `top_k` and by the store size.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, unique_count) = rt.block_on(async {
                let store = InMemoryVectorStore::new();

                // Deduplicate chunks by id to avoid upsert overwriting
                let mut deduped: HashMap<String, Chunk> = HashMap::new();
                for chunk in &chunks {
                    deduped.entry(chunk.id.clone()).or_insert_with(|| chunk.clone());
                }
                let unique_chunks: Vec<Chunk> = deduped.into_values().collect();
                let count = unique_chunks.len();

                store.upsert(&unique_chunks).await.unwrap();
                let results = store.search(&query, top_k).await.unwrap();
                (results, count)
            });

            // Result count is at most top_k and at most the number of stored chunks
            prop_assert!(results.len() <= top_k);
            prop_assert!(results.len() <= unique_count);

            // Results are ordered by descending score
            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}

#[tokio::test]
async fn search_returns_everything_when_store_is_smaller_than_top_k() {
    let store = InMemoryVectorStore::new();
    store
        .upsert(&[chunk("a_0", "a", vec![1.0, 0.0]), chunk("a_1", "a", vec![0.0, 1.0])])
        .await
        .unwrap();

    let results = store.search(&[1.0, 0.0], 5).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.id, "a_0");
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn delete_document_removes_only_that_document() {
    let store = InMemoryVectorStore::new();
    store
        .upsert(&[
            chunk("a_0", "a", vec![1.0, 0.0]),
            chunk("a_1", "a", vec![0.0, 1.0]),
            chunk("b_0", "b", vec![1.0, 1.0]),
        ])
        .await
        .unwrap();

    let removed = store.delete_document("a").await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(store.count().await.unwrap(), 1);
    let results = store.search(&[1.0, 0.0], 5).await.unwrap();
    assert!(results.iter().all(|r| r.chunk.document_id == "b"));
}

#[tokio::test]
async fn delete_document_on_absent_id_removes_nothing() {
    let store = InMemoryVectorStore::new();
    store.upsert(&[chunk("a_0", "a", vec![1.0, 0.0])]).await.unwrap();

    assert_eq!(store.delete_document("zzz").await.unwrap(), 0);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn upsert_replaces_chunks_with_the_same_id() {
    let store = InMemoryVectorStore::new();
    store.upsert(&[chunk("a_0", "a", vec![1.0, 0.0])]).await.unwrap();
    store.upsert(&[chunk("a_0", "a", vec![0.0, 1.0])]).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 1);
    let results = store.search(&[0.0, 1.0], 1).await.unwrap();
    assert!((results[0].score - 1.0).abs() < 1e-6);
}
