//! Core types for ingestion and query results

pub mod document;
pub mod response;

pub use document::{Document, DocumentFormat, Passage};
pub use response::{Answer, HealthReport, IndexStatus, IngestSummary};
