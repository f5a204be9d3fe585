use std::sync::Arc;

use crate::analysis::similarity::SimilarityScorer;
use crate::analysis::tips::TipsCapability;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; per-request results never live here.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable similarity backend. Default: LexicalSimilarity. Swap via EMBEDDING_API_URL.
    pub similarity: Arc<dyn SimilarityScorer>,
    /// Text generation for AI tips; `Unavailable` when no API key is configured.
    pub tips: TipsCapability,
}

/// State rooted in `root` with lexical similarity and no text generation.
#[cfg(test)]
pub fn test_state(root: &std::path::Path) -> AppState {
    use crate::analysis::similarity::LexicalSimilarity;

    let config = Config::for_tests(root);
    std::fs::create_dir_all(&config.upload_dir).unwrap();
    std::fs::create_dir_all(&config.static_dir).unwrap();

    AppState {
        config,
        similarity: Arc::new(LexicalSimilarity),
        tips: TipsCapability::Unavailable,
    }
}
