use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Application configuration loaded from environment variables.
/// Every variable is optional; optional capabilities (AI tips, embedding
/// similarity) are switched on by the presence of their credentials.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub chart_filename: String,
    pub anthropic_api_key: Option<String>,
    pub llm_timeout: Duration,
    pub tips_max_tokens: u32,
    pub embedding: Option<EmbeddingConfig>,
}

/// Settings for an OpenAI-compatible embeddings endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let embedding = optional_env("EMBEDDING_API_URL").map(|api_url| EmbeddingConfig {
            api_url,
            api_key: optional_env("EMBEDDING_API_KEY"),
            model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        });

        Ok(Config {
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: optional_env("UPLOAD_DIR")
                .unwrap_or_else(|| "uploads".to_string())
                .into(),
            static_dir: optional_env("STATIC_DIR")
                .unwrap_or_else(|| "static".to_string())
                .into(),
            chart_filename: optional_env("CHART_FILENAME")
                .unwrap_or_else(|| "chart.svg".to_string()),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            llm_timeout: Duration::from_secs(
                parse_env("LLM_TIMEOUT_SECS", 30)
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            tips_max_tokens: parse_env("TIPS_MAX_TOKENS", 300)
                .context("TIPS_MAX_TOKENS must be a positive integer")?,
            embedding,
        })
    }

    /// Full path of the chart artifact, overwritten on every analysis.
    pub fn chart_path(&self) -> PathBuf {
        self.static_dir.join(&self.chart_filename)
    }

    /// URL under which the chart is served by the static file route.
    pub fn chart_url(&self) -> String {
        format!("/static/{}", self.chart_filename)
    }
}

/// Reads a variable, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Invalid value '{raw}' for environment variable '{key}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration rooted in a scratch directory, with every optional
    /// capability disabled.
    pub fn for_tests(root: &std::path::Path) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            upload_dir: root.join("uploads"),
            static_dir: root.join("static"),
            chart_filename: "chart.svg".to_string(),
            anthropic_api_key: None,
            llm_timeout: Duration::from_secs(5),
            tips_max_tokens: 300,
            embedding: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_path_and_url_share_filename() {
        let config = Config::for_tests(std::path::Path::new("/tmp/fitcheck"));
        assert_eq!(
            config.chart_path(),
            PathBuf::from("/tmp/fitcheck/static/chart.svg")
        );
        assert_eq!(config.chart_url(), "/static/chart.svg");
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u32 = parse_env("FITCHECK_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
