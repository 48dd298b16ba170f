//! Provider abstractions for embeddings and answer generation
//!
//! Trait seams let the engine run against a live Ollama server or against
//! in-process test doubles.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
