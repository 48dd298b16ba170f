//! docrag: Document question answering over a local vector index
//!
//! Ingests a PDF, text, or Markdown document into a persisted vector index
//! and answers questions about it with an Ollama-served language model,
//! grounding every answer in retrieved passages.

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::RagConfig;
pub use engine::RagEngine;
pub use error::{Error, Result};
pub use types::{
    document::{Document, DocumentFormat, Passage},
    response::{Answer, HealthReport, IndexStatus, IngestSummary},
};
