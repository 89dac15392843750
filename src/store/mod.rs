//! Persisted vector collections
//!
//! A collection is a named set of (chunk id, text, vector) triples stored in
//! SQLite. `rebuild` replaces a collection wholesale; `query` ranks its
//! chunks by cosine distance to a query vector through an HNSW index built
//! over the stored vectors. One writer per collection name is assumed;
//! concurrent reads are safe (WAL).

mod collection;
mod vector;

pub use collection::{CollectionError, CollectionInfo, CollectionStore};
pub use vector::{SearchHit, VectorIndex, VectorIndexError};
