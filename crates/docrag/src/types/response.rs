//! Result payloads returned by engine operations

use serde::Serialize;

use super::document::DocumentFormat;

/// Summary of one completed ingestion
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    /// Document filename
    pub document: String,
    /// Detected format
    pub format: DocumentFormat,
    /// Page count (paginated formats only)
    pub pages: Option<u32>,
    /// Number of passages indexed
    pub passages: usize,
    /// Wall-clock ingestion time
    pub elapsed_ms: u64,
}

/// Answer to a question, with the document it was drawn from
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Raw model output, unmodified
    pub text: String,
    /// Filename of the document the index was built from
    pub document: String,
    /// Number of passages retrieved for the context block
    pub passages_retrieved: usize,
}

/// Description of the currently persisted index
#[derive(Debug, Clone, Serialize)]
pub struct IndexStatus {
    /// Document filename
    pub document: String,
    /// Document format
    pub format: DocumentFormat,
    /// Page count (paginated formats only)
    pub pages: Option<u32>,
    /// Number of indexed passages
    pub passages: usize,
    /// Embedding dimensionality
    pub dimensions: usize,
    /// When the index was built
    pub built_at: chrono::DateTime<chrono::Utc>,
}

/// Reachability of the two collaborator services
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Embedding service reachable
    pub embedding_ok: bool,
    /// Generation service reachable
    pub generation_ok: bool,
}
