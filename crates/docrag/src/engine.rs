//! Engine tying ingestion, retrieval, and generation together

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::ingestion::{DocumentLoader, TextChunker};
use crate::providers::{EmbeddingProvider, LlmProvider, OllamaProvider};
use crate::retrieval::VectorIndex;
use crate::types::{Answer, Document, HealthReport, IndexStatus, IngestSummary};

/// Session object over one persisted index
///
/// `ingest` replaces the index wholesale. `ask` and `status` read whatever
/// index is persisted at the configured storage path, so an engine answers
/// from the last successful ingestion even across restarts.
pub struct RagEngine {
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
}

impl fmt::Debug for RagEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RagEngine")
            .field("config", &self.config)
            .field("embedder", &self.embedder.name())
            .field("llm", &self.llm.name())
            .finish()
    }
}

impl RagEngine {
    /// Create an engine backed by the Ollama server named in the config
    pub fn new(config: RagConfig) -> Result<Self> {
        config.validate()?;
        let (embedder, llm) = OllamaProvider::split(&config.llm, config.embedding.dimensions)?;
        Ok(Self {
            config,
            embedder: Arc::new(embedder),
            llm: Arc::new(llm),
        })
    }

    /// Create an engine with explicit providers
    pub fn with_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            config,
            embedder,
            llm,
        }
    }

    /// Ingest one document, replacing any previously persisted index
    ///
    /// The previous index stays in place if any step fails.
    pub async fn ingest(&self, path: &Path) -> Result<IngestSummary> {
        let started = Instant::now();
        tracing::info!("Ingesting {}", path.display());

        let loaded = DocumentLoader::load(path)?;
        let mut document = Document::new(
            loaded.filename.clone(),
            loaded.format,
            loaded.content_hash.clone(),
            loaded.file_size,
        );
        document.total_pages = loaded.total_pages;

        let chunker = TextChunker::new(
            self.config.chunking.chunk_size,
            self.config.chunking.chunk_overlap,
        );
        let passages = chunker.chunk_segments(document.id, &loaded.segments);
        tracing::info!(
            "Chunked '{}' into {} passages",
            document.filename,
            passages.len()
        );

        let index = VectorIndex::build(
            document,
            passages,
            self.embedder.as_ref(),
            self.config.embedding.batch_size,
        )
        .await?;
        index.save(&self.config.index.storage_path)?;

        let document = index.document();
        Ok(IngestSummary {
            document: document.filename.clone(),
            format: document.format,
            pages: document.total_pages,
            passages: index.passage_count(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Answer a question from the persisted index
    ///
    /// An empty context block is passed through to the model as-is; the
    /// prompt instructs it to decline rather than guess.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let index = VectorIndex::load(&self.config.index.storage_path)?;

        let query_embedding = self.embedder.embed(question).await?;
        let results = index.search(&query_embedding, self.config.retrieval.top_k)?;
        tracing::info!("Retrieved {} passages for question", results.len());

        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_qa_prompt(question, &context);
        let text = self.llm.generate(&prompt).await?;

        Ok(Answer {
            text,
            document: index.document().filename.clone(),
            passages_retrieved: results.len(),
        })
    }

    /// Describe the persisted index
    pub fn status(&self) -> Result<IndexStatus> {
        let index = VectorIndex::load(&self.config.index.storage_path)?;
        let document = index.document();

        Ok(IndexStatus {
            document: document.filename.clone(),
            format: document.format,
            pages: document.total_pages,
            passages: index.passage_count(),
            dimensions: index.dimensions(),
            built_at: document.ingested_at,
        })
    }

    /// Probe both collaborator services
    pub async fn health(&self) -> HealthReport {
        let embedding_ok = self.embedder.health_check().await.unwrap_or(false);
        let generation_ok = self.llm.health_check().await.unwrap_or(false);

        HealthReport {
            embedding_ok,
            generation_ok,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &RagConfig {
        &self.config
    }
}
