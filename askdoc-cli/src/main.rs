//! askdoc: index a text document and answer questions about it from the
//! terminal, using a local Ollama server for embeddings and generation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use askdoc_model::OllamaModel;
use askdoc_rag::{
    Document, InMemoryVectorStore, OllamaEmbeddingProvider, PersistentVectorStore, RagConfig,
    RagPipeline, RetrievalQa, VectorStore,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod console;

#[derive(Debug, Parser)]
#[command(
    name = "askdoc",
    version,
    about = "Ask questions about a text document, answered by a local Ollama model"
)]
struct Args {
    /// Path to the UTF-8 text document to index
    document: PathBuf,

    /// Directory for the on-disk vector store
    #[arg(long, env = "ASKDOC_DATA_DIR", default_value = "./askdoc_db")]
    data_dir: PathBuf,

    /// Keep the vector store in memory instead of on disk
    #[arg(long)]
    in_memory: bool,

    /// Ollama embedding model
    #[arg(long, env = "ASKDOC_EMBEDDING_MODEL", default_value = "all-minilm")]
    embedding_model: String,

    /// Dimensionality of the embedding model's vectors
    #[arg(long, default_value_t = 384)]
    embedding_dimensions: usize,

    /// Ollama generation model
    #[arg(long, env = "ASKDOC_MODEL", default_value = "mistral")]
    model: String,

    /// Base URL of the Ollama server
    #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Number of chunks to retrieve per question
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Chunk size as a multiple of the average sentence length
    #[arg(long, default_value_t = 1.25)]
    size_multiplier: f64,

    /// Chunk overlap as a fraction of the average sentence length
    #[arg(long, default_value_t = 0.2)]
    overlap_ratio: f64,

    /// Drop retrieved chunks scoring below this similarity
    #[arg(long, default_value_t = 0.0)]
    similarity_threshold: f32,

    /// HTTP timeout for Ollama requests, in seconds
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let document = Document::from_path(&args.document)
        .with_context(|| format!("cannot load document '{}'", args.document.display()))?;

    let config = RagConfig::builder()
        .size_multiplier(args.size_multiplier)
        .overlap_ratio(args.overlap_ratio)
        .top_k(args.top_k)
        .similarity_threshold(args.similarity_threshold)
        .build()?;

    let timeout = Duration::from_secs(args.timeout_secs);
    let provider = OllamaEmbeddingProvider::with_timeout(timeout)?
        .with_base_url(args.ollama_url.clone())
        .with_model(args.embedding_model.clone())
        .with_dimensions(args.embedding_dimensions);
    println!("Embedding model initialized.");

    let store: Arc<dyn VectorStore> = if args.in_memory {
        Arc::new(InMemoryVectorStore::new())
    } else {
        Arc::new(
            PersistentVectorStore::open(
                &args.data_dir,
                args.embedding_model.clone(),
                args.embedding_dimensions,
            )
            .await?,
        )
    };

    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(provider))
        .vector_store(store)
        .build()?;

    let chunks = pipeline
        .ingest(&document)
        .await
        .with_context(|| format!("cannot index document '{}'", args.document.display()))?;
    println!("Document split into {} chunks.", chunks.len());
    if args.in_memory {
        println!("Vector store created in memory.");
    } else {
        println!("Vector store created and stored in '{}'.", args.data_dir.display());
    }

    let model = OllamaModel::with_timeout(timeout)?
        .with_base_url(args.ollama_url.clone())
        .with_model(args.model.clone());
    let qa = RetrievalQa::new(pipeline, Arc::new(model));

    println!();
    println!("Q&A chain is ready. You can now ask questions.");
    println!("Type 'exit' or 'quit' to stop.");
    println!("{}", console::SEPARATOR);

    console::run(&qa).await
}
