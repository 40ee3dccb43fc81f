//! Persistence tests: state survives reopen and resets when the embedding
//! model behind the stored vectors changes.

use std::collections::HashMap;

use askdoc_rag::{Chunk, PersistentVectorStore, VectorStore};

const MODEL: &str = "all-minilm";
const DIM: usize = 4;

fn chunk(id: &str, document_id: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: id.to_string(),
        text: format!("text for {id}"),
        embedding,
        metadata: HashMap::new(),
        document_id: document_id.to_string(),
    }
}

#[tokio::test]
async fn reopening_preserves_chunks() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = PersistentVectorStore::open(dir.path(), MODEL, DIM).await.unwrap();
        store
            .upsert(&[
                chunk("a_0", "a", vec![1.0, 0.0, 0.0, 0.0]),
                chunk("a_1", "a", vec![0.0, 1.0, 0.0, 0.0]),
            ])
            .await
            .unwrap();
    }

    let reopened = PersistentVectorStore::open(dir.path(), MODEL, DIM).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 2);

    let results = reopened.search(&[1.0, 0.0, 0.0, 0.0], 1).await.unwrap();
    assert_eq!(results[0].chunk.id, "a_0");
    assert_eq!(results[0].chunk.text, "text for a_0");
}

#[tokio::test]
async fn changing_the_embedding_model_resets_the_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = PersistentVectorStore::open(dir.path(), MODEL, DIM).await.unwrap();
        store.upsert(&[chunk("a_0", "a", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();
    }

    let other = PersistentVectorStore::open(dir.path(), "nomic-embed-text", DIM).await.unwrap();
    assert_eq!(other.count().await.unwrap(), 0);
    drop(other);

    // The reset is written back, so the old vectors are gone for good even
    // under the original model name.
    let original = PersistentVectorStore::open(dir.path(), MODEL, DIM).await.unwrap();
    assert_eq!(original.count().await.unwrap(), 0);
}

#[tokio::test]
async fn changing_dimensions_resets_the_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = PersistentVectorStore::open(dir.path(), MODEL, DIM).await.unwrap();
        store.upsert(&[chunk("a_0", "a", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();
    }

    let resized = PersistentVectorStore::open(dir.path(), MODEL, 8).await.unwrap();
    assert_eq!(resized.count().await.unwrap(), 0);
}

#[tokio::test]
async fn deletes_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = PersistentVectorStore::open(dir.path(), MODEL, DIM).await.unwrap();
        store
            .upsert(&[
                chunk("a_0", "a", vec![1.0, 0.0, 0.0, 0.0]),
                chunk("b_0", "b", vec![0.0, 1.0, 0.0, 0.0]),
            ])
            .await
            .unwrap();
        assert_eq!(store.delete_document("a").await.unwrap(), 1);
    }

    let reopened = PersistentVectorStore::open(dir.path(), MODEL, DIM).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 1);

    let results = reopened.search(&[0.0, 1.0, 0.0, 0.0], 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk.document_id, "b");
}

#[tokio::test]
async fn corrupt_state_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("chunks.json"), "{ this is not json").unwrap();

    let store = PersistentVectorStore::open(dir.path(), MODEL, DIM).await.unwrap();
    assert_eq!(store.count().await.unwrap(), 0);

    store.upsert(&[chunk("a_0", "a", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();
    drop(store);

    let reopened = PersistentVectorStore::open(dir.path(), MODEL, DIM).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 1);
}

#[tokio::test]
async fn open_creates_missing_data_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("deeply").join("nested").join("db");

    let store = PersistentVectorStore::open(&nested, MODEL, DIM).await.unwrap();
    store.upsert(&[chunk("a_0", "a", vec![1.0, 0.0, 0.0, 0.0])]).await.unwrap();

    assert!(nested.join("chunks.json").is_file());
}
