//! Kurso - Syllabus-to-Curriculum Planner
//!
//! Ingests a syllabus PDF, builds a persisted embedding index over its content,
//! and uses retrieved context plus a chat-completion service to synthesize a
//! multi-week curriculum: weekly subtopics, lesson plans, quizzes, resource
//! lists, and assignments, with optional HTML-to-PDF export.

pub mod cli;
pub mod config;
pub mod curriculum;
pub mod embedding;
pub mod error;
pub mod export;
pub mod ingest;
pub mod retrieval;
pub mod store;

pub use error::{KursoError, Result};
