//! Query-side retrieval over a persisted collection

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::store::{CollectionError, CollectionStore};
use std::sync::Arc;
use thiserror::Error;

/// Returned instead of joined chunk text when a query matches nothing
pub const NO_RESULTS: &str = "No relevant chunks found.";

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Embedding generation failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// Stateless retrieval facade
///
/// Embeds a query, ranks the collection's chunks against it, and joins the
/// top results into one context block. Holds no state of its own beyond the
/// injected provider and store handles.
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    store: Arc<CollectionStore>,
}

impl Retriever {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: Arc<CollectionStore>) -> Self {
        Self { provider, store }
    }

    /// Return the `top_k` most relevant chunks as one blank-line-separated block
    pub fn relevant_context(
        &self,
        query: &str,
        collection: &str,
        top_k: usize,
    ) -> Result<String, RetrievalError> {
        let query_embedding = self.provider.embed(query)?;
        let chunks = self.store.query(collection, &query_embedding, top_k)?;

        tracing::debug!(
            "Retrieved {} chunks from '{}' for query",
            chunks.len(),
            collection
        );

        if chunks.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        Ok(chunks.join("\n\n"))
    }
}
