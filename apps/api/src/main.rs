mod analysis;
mod config;
mod errors;
mod extract;
mod llm_client;
mod render;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod uploads;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::similarity::{EmbeddingSimilarity, LexicalSimilarity, SimilarityScorer};
use crate::analysis::tips::TipsCapability;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FitCheck v{}", env!("CARGO_PKG_VERSION"));

    for dir in [&config.upload_dir, &config.static_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Text generation is optional — no API key means tips degrade to a notice
    let tips = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.llm_timeout)
                .context("Failed to build LLM client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            TipsCapability::Available(Arc::new(llm))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set; AI tips disabled");
            TipsCapability::Unavailable
        }
    };

    let similarity: Arc<dyn SimilarityScorer> = match &config.embedding {
        Some(embedding) => {
            info!(
                "Embedding similarity enabled ({} via {})",
                embedding.model, embedding.api_url
            );
            Arc::new(
                EmbeddingSimilarity::new(embedding.clone(), config.llm_timeout)
                    .context("Failed to build embedding client")?,
            )
        }
        None => Arc::new(LexicalSimilarity),
    };

    let state = AppState {
        config: config.clone(),
        similarity,
        tips,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
