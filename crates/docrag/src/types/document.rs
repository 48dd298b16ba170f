//! Document and passage types with provenance for retrieval

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported document formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// PDF document
    Pdf,
    /// Plain text file
    Txt,
    /// Markdown file, ingested as plain text
    Markdown,
}

impl DocumentFormat {
    /// Detect the format from a lowercased extension without the dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" => Some(Self::Txt),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Txt => "Text File",
            Self::Markdown => "Markdown",
        }
    }
}

/// A document that has been ingested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Filename as supplied by the caller
    pub filename: String,
    /// Document format
    pub format: DocumentFormat,
    /// Content hash of the extracted text
    pub content_hash: String,
    /// Total number of pages (paginated formats only)
    pub total_pages: Option<u32>,
    /// Total number of passages created
    pub total_passages: u32,
    /// File size in bytes
    pub file_size: u64,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document record
    pub fn new(filename: String, format: DocumentFormat, content_hash: String, file_size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            format,
            content_hash,
            total_pages: None,
            total_passages: 0,
            file_size,
            ingested_at: chrono::Utc::now(),
        }
    }
}

/// A bounded span of document text, stored and retrieved as a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Unique passage ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content
    pub text: String,
    /// Page number (1-indexed) for paginated formats
    pub page: Option<u32>,
    /// Sequence position in document traversal order
    pub index: u32,
    /// Character offset of the span within its source segment
    pub char_start: usize,
    pub char_end: usize,
}

impl Passage {
    /// Create a new passage
    pub fn new(
        document_id: Uuid,
        text: String,
        page: Option<u32>,
        index: u32,
        char_start: usize,
        char_end: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            text,
            page,
            index,
            char_start,
            char_end,
        }
    }

    /// Length of the span in characters
    pub fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }
}
