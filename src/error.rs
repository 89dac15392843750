use std::path::PathBuf;
use thiserror::Error;

use crate::curriculum::CompletionError;
use crate::embedding::EmbeddingError;
use crate::export::RenderError;
use crate::ingest::{ChunkError, ExtractError, IngestError};
use crate::retrieval::RetrievalError;
use crate::store::CollectionError;

/// Main error type for the kurso application
#[derive(Error, Debug)]
pub enum KursoError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Document text extraction errors
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Chunking parameter errors
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// Ingestion pipeline errors
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Embedding model errors
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Collection store errors
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// Retrieval pipeline errors
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Completion service errors
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// PDF rendering errors
    #[error(transparent)]
    Render(#[from] RenderError),

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for kurso operations
pub type Result<T> = std::result::Result<T, KursoError>;
