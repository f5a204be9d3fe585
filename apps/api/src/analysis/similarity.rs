//! Similarity scoring — pluggable, trait-based scorer measuring how close a
//! resume is to a job description.
//!
//! Default: `LexicalSimilarity` (term-frequency cosine, pure Rust, deterministic).
//! Optional: `EmbeddingSimilarity` (OpenAI-compatible embeddings endpoint).
//!
//! `AppState` holds an `Arc<dyn SimilarityScorer>`, chosen at startup via config.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::keywords::content_terms;
use crate::config::EmbeddingConfig;

pub const LEXICAL_BACKEND: &str = "lexical";
pub const LEXICAL_FALLBACK_BACKEND: &str = "lexical-fallback";

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Embedding API returned {0} vectors, expected 2")]
    VectorCount(usize),
}

#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    /// Short label reported alongside the score.
    fn backend(&self) -> &'static str;

    /// Returns a score in [0, 1]; 1 means identical content.
    async fn score(&self, resume_text: &str, job_description: &str)
        -> Result<f32, SimilarityError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline entry point
// ────────────────────────────────────────────────────────────────────────────

/// Scores the pair with `scorer`, degrading to the lexical backend when the
/// configured scorer fails. Empty input on either side scores 0.0.
///
/// Returns the clamped score and the label of the backend that produced it.
pub async fn compute_similarity(
    scorer: &dyn SimilarityScorer,
    resume_text: &str,
    job_description: &str,
) -> (f32, &'static str) {
    if resume_text.trim().is_empty() || job_description.trim().is_empty() {
        return (0.0, scorer.backend());
    }

    match scorer.score(resume_text, job_description).await {
        Ok(score) => (clamp_score(score), scorer.backend()),
        Err(e) => {
            warn!(
                "Similarity backend '{}' failed, falling back to lexical: {e}",
                scorer.backend()
            );
            (
                clamp_score(lexical_similarity(resume_text, job_description)),
                LEXICAL_FALLBACK_BACKEND,
            )
        }
    }
}

fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Cosine similarity between two vectors. Mismatched lengths or zero
/// vectors score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        0.0
    } else {
        dot_product / (magnitude_a * magnitude_b)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LexicalSimilarity — default backend
// ────────────────────────────────────────────────────────────────────────────

/// Cosine similarity of term-frequency vectors over stop-word-filtered tokens.
pub struct LexicalSimilarity;

#[async_trait]
impl SimilarityScorer for LexicalSimilarity {
    fn backend(&self) -> &'static str {
        LEXICAL_BACKEND
    }

    async fn score(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<f32, SimilarityError> {
        Ok(lexical_similarity(resume_text, job_description))
    }
}

fn lexical_similarity(a: &str, b: &str) -> f32 {
    let freq_a = term_frequencies(a);
    let freq_b = term_frequencies(b);

    let mut vocabulary: Vec<&String> = freq_a.keys().chain(freq_b.keys()).collect();
    vocabulary.sort();
    vocabulary.dedup();

    let vector = |freq: &HashMap<String, f32>| -> Vec<f32> {
        vocabulary
            .iter()
            .map(|term| freq.get(*term).copied().unwrap_or(0.0))
            .collect()
    };

    cosine_similarity(&vector(&freq_a), &vector(&freq_b))
}

fn term_frequencies(text: &str) -> HashMap<String, f32> {
    let mut freq = HashMap::new();
    for term in content_terms(text) {
        *freq.entry(term).or_insert(0.0) += 1.0;
    }
    freq
}

// ────────────────────────────────────────────────────────────────────────────
// EmbeddingSimilarity — OpenAI-compatible embeddings endpoint
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 2],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Embeds both documents in one request and compares the vectors.
/// The timeout bounds the whole exchange, from connect to the last body byte.
pub struct EmbeddingSimilarity {
    client: Client,
    config: EmbeddingConfig,
    timeout: Duration,
}

impl EmbeddingSimilarity {
    pub fn new(config: EmbeddingConfig, timeout: Duration) -> Result<Self, SimilarityError> {
        Ok(Self {
            client: Client::builder().build()?,
            config,
            timeout,
        })
    }

    async fn embed_pair(
        &self,
        first: &str,
        second: &str,
    ) -> Result<(Vec<f32>, Vec<f32>), SimilarityError> {
        tokio::time::timeout(self.timeout, self.exchange(first, second))
            .await
            .map_err(|_| SimilarityError::Timeout(self.timeout))?
    }

    async fn exchange(
        &self,
        first: &str,
        second: &str,
    ) -> Result<(Vec<f32>, Vec<f32>), SimilarityError> {
        let mut request = self
            .client
            .post(&self.config.api_url)
            .json(&EmbeddingRequest {
                model: &self.config.model,
                input: [first, second],
            });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SimilarityError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: EmbeddingResponse = response.json().await?;
        into_pair(body)
    }
}

fn into_pair(mut body: EmbeddingResponse) -> Result<(Vec<f32>, Vec<f32>), SimilarityError> {
    if body.data.len() != 2 {
        return Err(SimilarityError::VectorCount(body.data.len()));
    }
    body.data.sort_by_key(|d| d.index);
    let second = body.data.pop().map(|d| d.embedding).unwrap_or_default();
    let first = body.data.pop().map(|d| d.embedding).unwrap_or_default();
    Ok((first, second))
}

#[async_trait]
impl SimilarityScorer for EmbeddingSimilarity {
    fn backend(&self) -> &'static str {
        "embedding"
    }

    async fn score(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<f32, SimilarityError> {
        let (resume_vec, jd_vec) = self.embed_pair(resume_text, job_description).await?;
        debug!("Embedding dimension: {}", resume_vec.len());
        Ok(cosine_similarity(&resume_vec, &jd_vec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    struct FailingScorer;

    #[async_trait]
    impl SimilarityScorer for FailingScorer {
        fn backend(&self) -> &'static str {
            "embedding"
        }

        async fn score(&self, _: &str, _: &str) -> Result<f32, SimilarityError> {
            Err(SimilarityError::Timeout(Duration::from_secs(1)))
        }
    }

    struct OutOfRangeScorer;

    #[async_trait]
    impl SimilarityScorer for OutOfRangeScorer {
        fn backend(&self) -> &'static str {
            "embedding"
        }

        async fn score(&self, _: &str, _: &str) -> Result<f32, SimilarityError> {
            Ok(-0.3)
        }
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [0.2, 0.4, 0.6];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_mismatched_or_zero_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_lexical_identical_documents_score_one() {
        let text = "Rust services on Kubernetes with Postgres";
        assert!((lexical_similarity(text, text) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lexical_disjoint_documents_score_zero() {
        assert_eq!(lexical_similarity("python django", "rust tokio"), 0.0);
    }

    #[test]
    fn test_lexical_partial_overlap_is_between_bounds() {
        let score = lexical_similarity("I know Python and SQL", "Looking for Python and Java developer");
        assert!(score > 0.0 && score < 1.0, "score was {score}");
    }

    #[tokio::test]
    async fn test_empty_input_scores_zero() {
        let (score, backend) = compute_similarity(&LexicalSimilarity, "", "Rust").await;
        assert_eq!(score, 0.0);
        assert_eq!(backend, LEXICAL_BACKEND);
    }

    #[tokio::test]
    async fn test_failing_backend_falls_back_to_lexical() {
        let (score, backend) = compute_similarity(&FailingScorer, "rust tokio", "rust axum").await;
        assert_eq!(backend, LEXICAL_FALLBACK_BACKEND);
        assert!(score > 0.0);
    }

    #[tokio::test]
    async fn test_scores_are_clamped() {
        let (score, _) = compute_similarity(&OutOfRangeScorer, "a resume", "a job").await;
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_embedding_response_reordered_by_index() {
        let json = r#"{"data": [
            {"index": 1, "embedding": [0.0, 1.0]},
            {"index": 0, "embedding": [1.0, 0.0]}
        ]}"#;
        let body: EmbeddingResponse = serde_json::from_str(json).unwrap();
        let (first, second) = into_pair(body).unwrap();
        assert_eq!(first, vec![1.0, 0.0]);
        assert_eq!(second, vec![0.0, 1.0]);
    }

    #[test]
    fn test_embedding_response_with_wrong_count() {
        let body: EmbeddingResponse =
            serde_json::from_str(r#"{"data": [{"index": 0, "embedding": [1.0]}]}"#).unwrap();
        assert!(matches!(into_pair(body), Err(SimilarityError::VectorCount(1))));
    }

    fn embedding_for(api_url: String, timeout: Duration) -> EmbeddingSimilarity {
        let config = EmbeddingConfig {
            api_url,
            api_key: Some("test-key".to_string()),
            model: "test-embedding".to_string(),
        };
        EmbeddingSimilarity {
            client: Client::builder().no_proxy().build().unwrap(),
            config,
            timeout,
        }
    }

    #[tokio::test]
    async fn test_unresponsive_embedding_endpoint_times_out() {
        let url = test_support::silent_server().await;
        let scorer = embedding_for(format!("{url}/embeddings"), Duration::from_millis(200));

        let err = scorer.score("rust tokio", "rust axum").await.unwrap_err();
        assert!(matches!(err, SimilarityError::Timeout(d) if d == Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn test_unresponsive_embedding_endpoint_falls_back() {
        let url = test_support::silent_server().await;
        let scorer = embedding_for(format!("{url}/embeddings"), Duration::from_millis(200));

        let (score, backend) = compute_similarity(&scorer, "rust tokio", "rust axum").await;
        assert_eq!(backend, LEXICAL_FALLBACK_BACKEND);
        assert!((score - lexical_similarity("rust tokio", "rust axum")).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_embedding_error_status_is_api_error() {
        let url = test_support::canned_server("500 Internal Server Error", r#"{"error":"overloaded"}"#).await;
        let scorer = embedding_for(format!("{url}/embeddings"), Duration::from_secs(5));

        let err = scorer.score("rust tokio", "rust axum").await.unwrap_err();
        match err {
            SimilarityError::Api { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("overloaded"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_embedding_endpoint_scores_returned_vectors() {
        let url = test_support::canned_server(
            "200 OK",
            r#"{"data":[{"index":0,"embedding":[1.0,0.0]},{"index":1,"embedding":[1.0,0.0]}]}"#,
        )
        .await;
        let scorer = embedding_for(format!("{url}/embeddings"), Duration::from_secs(5));

        let (score, backend) = compute_similarity(&scorer, "rust tokio", "rust axum").await;
        assert_eq!(backend, "embedding");
        assert!((score - 1.0).abs() < 1e-6);
    }
}
