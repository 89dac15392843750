//! Ingestion pipeline: document -> chunks -> embeddings -> collection

use super::{chunk_text, extract_text, ChunkError, ExtractError};
use crate::config::ChunkingConfig;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::store::{CollectionError, CollectionStore};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Chunk(#[from] ChunkError),

    #[error("Embedding generation failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// Summary of one ingestion run
#[derive(Debug)]
pub struct IngestReport {
    pub characters: usize,
    pub chunks: usize,
    pub dimension: usize,
}

/// Ingestion pipeline over an embedding provider and a collection store
///
/// Rebuilds the target collection from scratch on every run; ingesting a
/// second document under the same collection name replaces the first.
pub struct Ingestor {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<CollectionStore>,
    chunking: ChunkingConfig,
}

impl Ingestor {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        store: Arc<CollectionStore>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            provider,
            store,
            chunking,
        }
    }

    /// Extract a PDF and rebuild `collection` from its text
    pub fn ingest_file(&self, path: &Path, collection: &str) -> Result<IngestReport, IngestError> {
        tracing::info!("Extracting text from {:?}", path);
        let text = extract_text(path)?;
        self.ingest_text(&text, collection)
    }

    /// Chunk, embed, and rebuild `collection` from already-extracted text
    pub fn ingest_text(&self, text: &str, collection: &str) -> Result<IngestReport, IngestError> {
        let chunks = chunk_text(text, self.chunking.chunk_size, self.chunking.overlap)?;
        tracing::info!("Split {} characters into {} chunks", text.chars().count(), chunks.len());

        // An empty document produces zero chunks; the store rejects that
        // rather than building an empty collection.
        let embeddings = self.provider.embed_batch(&chunks)?;

        let info = self.store.rebuild(
            collection,
            self.provider.model_name(),
            &chunks,
            &embeddings,
        )?;

        tracing::info!(
            "Rebuilt collection '{}' with {} chunks ({}D)",
            collection,
            info.chunk_count,
            info.dimension
        );

        Ok(IngestReport {
            characters: text.chars().count(),
            chunks: info.chunk_count,
            dimension: info.dimension,
        })
    }
}
