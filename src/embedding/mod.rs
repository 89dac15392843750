//! Embedding generation
//!
//! One provider instance is constructed in `main` and shared by ingestion and
//! retrieval so every vector in a collection comes from the same model.

mod provider;

pub use provider::{EmbeddingError, EmbeddingProvider, FastEmbedProvider};
