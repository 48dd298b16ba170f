//! Exact-search vector index with JSON persistence

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::{Document, Passage};

/// One passage with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Indexed passage
    pub passage: Passage,
    /// Embedding vector
    pub embedding: Vec<f32>,
}

/// A retrieved passage with its similarity score
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Retrieved passage
    pub passage: Passage,
    /// Cosine similarity against the query
    pub score: f32,
}

/// Vector index over a single document
///
/// Search is exact: every entry is scored against the query. The index
/// serializes to one JSON file and is replaced wholesale on re-ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    /// Document the index was built from
    document: Document,
    /// Embedding dimensionality
    dimensions: usize,
    /// Entries in passage order
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Embed all passages and build the index
    pub async fn build(
        mut document: Document,
        passages: Vec<Passage>,
        embedder: &dyn EmbeddingProvider,
        batch_size: usize,
    ) -> Result<Self> {
        if passages.is_empty() {
            return Err(Error::ingestion(format!(
                "'{}' produced no indexable text",
                document.filename
            )));
        }

        let dimensions = embedder.dimensions();
        let batch_size = batch_size.max(1);
        tracing::info!(
            "Embedding {} passages in batches of {}",
            passages.len(),
            batch_size
        );

        let mut entries = Vec::with_capacity(passages.len());
        for batch in passages.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();

            // Fail fast: no partial index is ever committed
            let embeddings = embedder
                .embed_batch(&texts)
                .await
                .map_err(|e| Error::ingestion(format!("Failed to embed passages: {}", e)))?;

            if embeddings.len() != batch.len() {
                return Err(Error::ingestion(format!(
                    "Embedder returned {} vectors for {} texts",
                    embeddings.len(),
                    batch.len()
                )));
            }

            for (passage, embedding) in batch.iter().zip(embeddings) {
                if embedding.len() != dimensions {
                    return Err(Error::ingestion(format!(
                        "Expected {} dimensions, got {}",
                        dimensions,
                        embedding.len()
                    )));
                }
                entries.push(IndexEntry {
                    passage: passage.clone(),
                    embedding,
                });
            }
        }

        document.total_passages = entries.len() as u32;

        Ok(Self {
            document,
            dimensions,
            entries,
        })
    }

    /// Score every entry against the query and return the top `k`
    ///
    /// Ties keep passage order because the sort is stable.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dimensions {
            return Err(Error::index(format!(
                "Query embedding has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                passage: entry.passage.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    /// Write the index to disk, replacing any existing file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_vec(self)?;

        // Write to a sibling temp file first so a crash mid-write cannot
        // leave a truncated index behind
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(&data)?;
        tmp.persist(path)
            .map_err(|e| Error::index(format!("Failed to persist index: {}", e)))?;

        tracing::info!("Saved index with {} passages to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Load a previously saved index
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::IndexNotFound(path.to_path_buf()));
        }

        let data = std::fs::read(path)?;
        serde_json::from_slice(&data).map_err(|e| {
            Error::index(format!(
                "Index file '{}' is corrupt ({}); re-ingest the document",
                path.display(),
                e
            ))
        })
    }

    /// Document the index was built from
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Embedding dimensionality
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed passages
    pub fn passage_count(&self) -> usize {
        self.entries.len()
    }
}

/// Cosine similarity between two vectors, 0.0 when either has zero norm
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
