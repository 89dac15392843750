//! HNSW vector index for similarity search

use hnsw_rs::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorIndexError {
    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },
}

/// Search result with chunk position and cosine distance
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Position of the chunk within its collection
    pub id: usize,
    /// Cosine distance (lower is more similar)
    pub distance: f32,
}

/// In-memory HNSW index over one collection's vectors
///
/// Built from the stored vectors at query time and discarded afterwards;
/// persistence lives in the collection store, not here.
pub struct VectorIndex {
    index: Hnsw<'static, f32, DistCosine>,
    dimension: usize,
    count: usize,
}

impl VectorIndex {
    /// Create an empty index
    ///
    /// # Arguments
    /// * `dimension` - vector dimension (must match the embedding dimension)
    /// * `m` - HNSW connections per layer
    /// * `ef_construction` - HNSW construction parameter
    /// * `capacity` - expected number of vectors
    pub fn new(dimension: usize, m: usize, ef_construction: usize, capacity: usize) -> Self {
        // (max connections, capacity, max layers, ef_construction, metric)
        let index =
            Hnsw::<f32, DistCosine>::new(m, capacity.max(16), 16, ef_construction, DistCosine);

        Self {
            index,
            dimension,
            count: 0,
        }
    }

    /// Insert a vector under a chunk position
    pub fn insert(&mut self, id: usize, vector: &[f32]) -> Result<(), VectorIndexError> {
        if vector.len() != self.dimension {
            return Err(VectorIndexError::InvalidDimension {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let data = vector.to_vec();
        self.index.insert((&data, id));
        self.count += 1;

        Ok(())
    }

    /// Return up to `k` hits ordered by ascending cosine distance
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        ef_search: usize,
    ) -> Result<Vec<SearchHit>, VectorIndexError> {
        if query.len() != self.dimension {
            return Err(VectorIndexError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        if k == 0 {
            return Ok(Vec::new());
        }

        // ef must cover k for the search to return k neighbors
        let ef = ef_search.max(k);
        let mut hits: Vec<SearchHit> = self
            .index
            .search(query, k, ef)
            .into_iter()
            .map(|neighbor| SearchHit {
                id: neighbor.d_id,
                distance: neighbor.distance,
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(hits)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
