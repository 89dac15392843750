//! Syllabus ingestion: text extraction, chunking, and index building
//!
//! A document flows one direction: PDF -> extracted text -> overlapping
//! character windows -> embeddings -> a rebuilt collection in the store.

mod chunker;
mod extractor;
mod pipeline;

pub use chunker::{chunk_text, ChunkError};
pub use extractor::{extract_text, ExtractError};
pub use pipeline::{IngestError, IngestReport, Ingestor};
