//! docrag CLI binary
//!
//! Run with: cargo run -p docrag -- ingest report.pdf

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docrag::{RagConfig, RagEngine};

/// Ask questions about one local document.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file falls back to built-in defaults.
#[derive(Parser)]
#[command(
    name = "docrag",
    about = "Document question answering over a local vector index",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "docrag.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a document into the index.
    ///
    /// Loads a PDF, text, or Markdown file, chunks it into overlapping
    /// passages, embeds every passage, and replaces the persisted index.
    /// The previous index stays in place if any step fails.
    Ingest {
        /// Path to the document (.pdf, .txt, or .md).
        file: PathBuf,
    },

    /// Ask a question about the ingested document.
    ///
    /// Embeds the question, retrieves the most similar passages, and
    /// generates an answer grounded in them.
    Ask {
        /// The question to answer.
        question: String,
    },

    /// Show the currently persisted index.
    Status,

    /// Check that the Ollama server answers for embeddings and generation.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docrag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = RagConfig::load(&cli.config)?;
    let engine = RagEngine::new(config)?;

    match cli.command {
        Commands::Ingest { file } => {
            let summary = engine.ingest(&file).await?;

            println!(
                "Ingested '{}' ({})",
                summary.document,
                summary.format.display_name()
            );
            if let Some(pages) = summary.pages {
                println!("  Pages:    {}", pages);
            }
            println!("  Passages: {}", summary.passages);
            println!("  Index:    {}", engine.config().index.storage_path.display());
            println!("  Took:     {} ms", summary.elapsed_ms);
        }
        Commands::Ask { question } => {
            let answer = engine.ask(&question).await?;

            println!("{}", answer.text.trim());
            println!();
            println!(
                "[{} passages from '{}']",
                answer.passages_retrieved, answer.document
            );
        }
        Commands::Status => {
            let status = engine.status()?;

            println!(
                "Document:   {} ({})",
                status.document,
                status.format.display_name()
            );
            if let Some(pages) = status.pages {
                println!("Pages:      {}", pages);
            }
            println!("Passages:   {}", status.passages);
            println!("Dimensions: {}", status.dimensions);
            println!(
                "Built at:   {}",
                status.built_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        Commands::Health => {
            let report = engine.health().await;
            let llm = &engine.config().llm;

            println!("Ollama at {}", llm.base_url);
            println!(
                "  Embeddings: {}",
                if report.embedding_ok { "ok" } else { "unreachable" }
            );
            println!(
                "  Generation: {}",
                if report.generation_ok { "ok" } else { "unreachable" }
            );

            if !report.embedding_ok || !report.generation_ok {
                println!();
                println!("Start Ollama and pull the models:");
                println!("  ollama serve");
                println!("  ollama pull {}", llm.embed_model);
                println!("  ollama pull {}", llm.generate_model);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
