//! SQLite-backed collection storage

use super::{VectorIndex, VectorIndexError};
use crate::config::IndexConfig;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Collection not found: {0}")]
    NotFound(String),

    #[error("No chunks to index")]
    EmptyCollection,

    #[error("Chunk/embedding count mismatch: {chunks} chunks, {embeddings} embeddings")]
    CountMismatch { chunks: usize, embeddings: usize },

    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Index(#[from] VectorIndexError),
}

/// Metadata of a persisted collection
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub name: String,
    pub model: String,
    pub dimension: usize,
    pub chunk_count: usize,
    pub created_at: i64,
}

/// Store of named chunk/vector collections
///
/// Each collection owns its persisted chunk and vector data exclusively;
/// rebuilding under an existing name replaces that data in one transaction.
pub struct CollectionStore {
    pool: DbPool,
    index_config: IndexConfig,
}

impl CollectionStore {
    /// Open (or create) the store at `db_path`
    pub fn new(db_path: &Path, index_config: IndexConfig) -> Result<Self, CollectionError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(8)
            .build(manager)
            .map_err(|e| CollectionError::Pool(e.to_string()))?;

        {
            let conn = pool
                .get()
                .map_err(|e| CollectionError::Pool(e.to_string()))?;

            // WAL keeps concurrent readers safe against a single writer
            conn.execute_batch(
                "
                PRAGMA journal_mode = WAL;
                PRAGMA synchronous = NORMAL;
                PRAGMA busy_timeout = 5000;
                ",
            )?;
        }

        let store = Self { pool, index_config };
        store.migrate()?;

        Ok(store)
    }

    fn get_conn(
        &self,
    ) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, CollectionError> {
        self.pool
            .get()
            .map_err(|e| CollectionError::Pool(e.to_string()))
    }

    /// Run database migrations
    fn migrate(&self) -> Result<(), CollectionError> {
        let conn = self.get_conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let current_version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM _migrations",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        for (version, migration) in MIGRATIONS.iter().enumerate() {
            let version = version as i32 + 1;

            if version > current_version {
                tracing::info!("Applying migration {}", version);
                conn.execute_batch(migration)?;
                conn.execute(
                    "INSERT INTO _migrations (version, applied_at) VALUES (?1, datetime('now'))",
                    params![version],
                )?;
            }
        }

        Ok(())
    }

    /// Drop any collection named `name` and rebuild it from the given chunks
    ///
    /// Chunk identifiers are positional (`chunk-<i>`). All embeddings must
    /// share one dimension and come from the same model as each other.
    pub fn rebuild(
        &self,
        name: &str,
        model: &str,
        chunks: &[String],
        embeddings: &[Vec<f32>],
    ) -> Result<CollectionInfo, CollectionError> {
        if chunks.is_empty() {
            return Err(CollectionError::EmptyCollection);
        }
        if chunks.len() != embeddings.len() {
            return Err(CollectionError::CountMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        let dimension = embeddings[0].len();
        for embedding in embeddings {
            if embedding.len() != dimension {
                return Err(CollectionError::InvalidDimension {
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
        }

        let created_at = chrono::Utc::now().timestamp();

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        // Deletes are explicit rather than FK-cascaded; the pragma would
        // have to be set on every pooled connection.
        tx.execute(
            "DELETE FROM chunks WHERE collection_id IN
                (SELECT id FROM collections WHERE name = ?1)",
            params![name],
        )?;
        tx.execute("DELETE FROM collections WHERE name = ?1", params![name])?;

        tx.execute(
            "INSERT INTO collections (name, model, dimension, chunk_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, model, dimension, chunks.len(), created_at],
        )?;
        let collection_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO chunks (collection_id, chunk_id, position, text, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (i, (chunk, embedding)) in chunks.iter().zip(embeddings.iter()).enumerate() {
                stmt.execute(params![
                    collection_id,
                    format!("chunk-{}", i),
                    i as i64,
                    chunk,
                    vector_to_blob(embedding),
                ])?;
            }
        }

        tx.commit()?;

        Ok(CollectionInfo {
            name: name.to_string(),
            model: model.to_string(),
            dimension,
            chunk_count: chunks.len(),
            created_at,
        })
    }

    /// Return up to `top_k` chunk texts ordered by ascending cosine distance
    ///
    /// A `top_k` larger than the collection returns every chunk.
    pub fn query(
        &self,
        name: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<String>, CollectionError> {
        let info = self.info(name)?;

        if query_vector.len() != info.dimension {
            return Err(CollectionError::InvalidDimension {
                expected: info.dimension,
                actual: query_vector.len(),
            });
        }

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT c.position, c.text, c.embedding
             FROM chunks c
             JOIN collections col ON col.id = c.collection_id
             WHERE col.name = ?1
             ORDER BY c.position",
        )?;

        let rows = stmt.query_map(params![name], |row| {
            Ok((
                row.get::<_, i64>(0)? as usize,
                row.get::<_, String>(1)?,
                row.get::<_, Vec<u8>>(2)?,
            ))
        })?;

        let mut texts = Vec::with_capacity(info.chunk_count);
        let mut index = VectorIndex::new(
            info.dimension,
            self.index_config.hnsw_m,
            self.index_config.hnsw_ef_construction,
            info.chunk_count,
        );

        // Positions are dense (0..n), assigned by rebuild
        for row in rows {
            let (position, text, blob) = row?;
            index.insert(position, &blob_to_vector(&blob))?;
            texts.push(text);
        }

        let hits = index.search(query_vector, top_k, self.index_config.hnsw_ef_search)?;

        Ok(hits
            .into_iter()
            .filter_map(|hit| texts.get(hit.id).cloned())
            .collect())
    }

    /// Look up collection metadata, failing if the name was never built
    pub fn info(&self, name: &str) -> Result<CollectionInfo, CollectionError> {
        let conn = self.get_conn()?;

        conn.query_row(
            "SELECT name, model, dimension, chunk_count, created_at
             FROM collections WHERE name = ?1",
            params![name],
            |row| {
                Ok(CollectionInfo {
                    name: row.get(0)?,
                    model: row.get(1)?,
                    dimension: row.get::<_, i64>(2)? as usize,
                    chunk_count: row.get::<_, i64>(3)? as usize,
                    created_at: row.get(4)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| CollectionError::NotFound(name.to_string()))
    }
}

/// Encode a vector as little-endian f32 bytes
fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|x| x.to_le_bytes()).collect()
}

/// Decode little-endian f32 bytes back into a vector
fn blob_to_vector(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Database migrations (each string is one migration)
const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    CREATE TABLE collections (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        model TEXT NOT NULL,
        dimension INTEGER NOT NULL,
        chunk_count INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE chunks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        collection_id INTEGER NOT NULL,
        chunk_id TEXT NOT NULL,
        position INTEGER NOT NULL,
        text TEXT NOT NULL,
        embedding BLOB NOT NULL,
        FOREIGN KEY (collection_id) REFERENCES collections(id) ON DELETE CASCADE
    );

    CREATE INDEX idx_chunks_collection ON chunks(collection_id);
    "#,
];

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (CollectionStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("collections.db");
        let store = CollectionStore::new(&db_path, IndexConfig::default()).unwrap();
        (store, temp)
    }

    fn axis(dimension: usize, axis: usize) -> Vec<f32> {
        let mut v = vec![0.0; dimension];
        v[axis] = 1.0;
        v
    }

    #[test]
    fn test_rebuild_and_query() {
        let (store, _temp) = test_store();

        let chunks = vec![
            "graphs and traversals".to_string(),
            "sorting algorithms".to_string(),
            "complexity theory".to_string(),
        ];
        let embeddings = vec![axis(4, 0), axis(4, 1), axis(4, 2)];

        let info = store
            .rebuild("syllabus", "test-model", &chunks, &embeddings)
            .unwrap();
        assert_eq!(info.chunk_count, 3);
        assert_eq!(info.dimension, 4);

        let results = store.query("syllabus", &axis(4, 1), 1).unwrap();
        assert_eq!(results, vec!["sorting algorithms".to_string()]);
    }

    #[test]
    fn test_empty_rebuild_rejected() {
        let (store, _temp) = test_store();
        let result = store.rebuild("syllabus", "test-model", &[], &[]);
        assert!(matches!(result, Err(CollectionError::EmptyCollection)));
    }

    #[test]
    fn test_query_unknown_collection() {
        let (store, _temp) = test_store();
        let result = store.query("never-built", &axis(4, 0), 3);
        assert!(matches!(result, Err(CollectionError::NotFound(_))));
    }

    #[test]
    fn test_rebuild_replaces_previous_data() {
        let (store, _temp) = test_store();

        let first = vec!["old chunk".to_string()];
        store
            .rebuild("syllabus", "test-model", &first, &[axis(4, 0)])
            .unwrap();

        let second = vec!["new chunk a".to_string(), "new chunk b".to_string()];
        store
            .rebuild("syllabus", "test-model", &second, &[axis(4, 0), axis(4, 1)])
            .unwrap();

        let results = store.query("syllabus", &axis(4, 0), 10).unwrap();
        assert_eq!(results.len(), 2);
        assert!(!results.contains(&"old chunk".to_string()));
    }

    #[test]
    fn test_top_k_beyond_collection_size() {
        let (store, _temp) = test_store();

        let chunks = vec!["a".to_string(), "b".to_string()];
        store
            .rebuild("syllabus", "test-model", &chunks, &[axis(4, 0), axis(4, 1)])
            .unwrap();

        let results = store.query("syllabus", &axis(4, 0), 100).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let (store, _temp) = test_store();

        store
            .rebuild("syllabus", "test-model", &["x".to_string()], &[axis(4, 0)])
            .unwrap();

        let result = store.query("syllabus", &axis(8, 0), 1);
        assert!(matches!(
            result,
            Err(CollectionError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_chunk_identifiers_are_positional() {
        let (store, _temp) = test_store();

        let chunks = vec!["a".to_string(), "b".to_string()];
        store
            .rebuild("syllabus", "test-model", &chunks, &[axis(4, 0), axis(4, 1)])
            .unwrap();

        let conn = store.get_conn().unwrap();
        let ids: Vec<String> = conn
            .prepare("SELECT chunk_id FROM chunks ORDER BY position")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert_eq!(ids, vec!["chunk-0".to_string(), "chunk-1".to_string()]);
    }

    #[test]
    fn test_blob_roundtrip() {
        let vector = vec![0.25_f32, -1.5, 3.75];
        assert_eq!(blob_to_vector(&vector_to_blob(&vector)), vector);
    }
}
