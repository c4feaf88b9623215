use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use regdoc_gemini::{GeminiClient, GeminiConfig, LLMProvider};
use regdoc_rag::{
    EmbeddingBackend, IndexBuilder, IndexOutcome, RagConfig, RetrievalQa, ReusePolicy,
    build_embedder,
};
use regdoc_web::{Launch, gate, router, ui};

#[derive(Parser)]
#[command(name = "regdoc")]
#[command(about = "Ask questions about a regulations PDF and get answers with page citations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// PDF to answer questions about
    #[arg(long, global = true)]
    pdf: Option<PathBuf>,

    /// Directory holding the persisted vector index
    #[arg(long, global = true)]
    index_dir: Option<PathBuf>,

    /// Number of chunks retrieved per question
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// When an existing index may be reused: "content_hash" or "directory_presence"
    #[arg(long, global = true)]
    reuse_policy: Option<ReusePolicy>,

    /// Embedding backend: "ollama" or "hash"
    #[arg(long, global = true)]
    embedding_backend: Option<EmbeddingBackend>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or reuse the index, then serve the web interface (default)
    Serve {
        /// Address to bind the HTTP server to (host:port)
        #[arg(long, env = "REGDOC_BIND", default_value = "127.0.0.1:7860")]
        bind: String,
    },
    /// Build or reuse the index and exit
    Ingest,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let embedder = build_embedder(&config.embedding).context("failed to set up the embedder")?;
    let builder = IndexBuilder::new(config.clone(), embedder.clone());
    let (index, outcome) = builder
        .build_or_load()
        .await
        .with_context(|| format!("failed to index {}", config.pdf_path.display()))?;

    let bind = match cli.command {
        Some(Commands::Ingest) => {
            report_outcome(&outcome, &config);
            return Ok(());
        }
        Some(Commands::Serve { bind }) => bind,
        None => std::env::var("REGDOC_BIND").unwrap_or_else(|_| "127.0.0.1:7860".to_string()),
    };

    let top_k = config.top_k;
    let launch = gate(GeminiConfig::from_env(), move |gemini| {
        let llm: Arc<dyn LLMProvider> = Arc::new(GeminiClient::new(gemini)?);
        tracing::info!("Answering with {}", llm.model_id());
        let qa = RetrievalQa::new(embedder, Arc::new(index), llm).with_top_k(top_k);
        Ok(router(Arc::new(qa)))
    })?;

    match launch {
        Launch::Ready(app) => {
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {}", bind))?;

            ui::display_banner(&bind, outcome.entries());
            tracing::info!("Serving on http://{}", bind);

            axum_serve(listener, app).await
        }
        Launch::Unavailable(message) => {
            ui::display_unavailable(&message);
            Ok(())
        }
    }
}

/// Environment configuration with command-line overrides applied
fn load_config(cli: &Cli) -> Result<RagConfig> {
    let mut config = RagConfig::from_env().context("invalid configuration")?;

    if let Some(pdf) = &cli.pdf {
        config.pdf_path = pdf.clone();
    }
    if let Some(index_dir) = &cli.index_dir {
        config.index_dir = index_dir.clone();
    }
    if let Some(top_k) = cli.top_k {
        config.top_k = top_k;
    }
    if let Some(policy) = cli.reuse_policy {
        config.reuse_policy = policy;
    }
    if let Some(backend) = cli.embedding_backend {
        config.embedding.backend = backend;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn report_outcome(outcome: &IndexOutcome, config: &RagConfig) {
    let action = match outcome {
        IndexOutcome::Reused { .. } => "Reused",
        IndexOutcome::Built { .. } => "Built",
    };
    println!(
        "{} {} index at {} ({} chunks)",
        "✓".green().bold(),
        action,
        config.index_dir.display(),
        outcome.entries()
    );
}

async fn axum_serve(listener: tokio::net::TcpListener, app: axum::Router) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await
        .context("server shutdown")
}
