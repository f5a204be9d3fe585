//! Analysis pipeline: keywords → similarity → suggestion → AI tips → chart.
//!
//! Every call builds a fresh `AnalysisReport`; nothing is shared between
//! requests except the chart file, which each run replaces.

pub mod chart;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod similarity;
pub mod stopwords;
pub mod suggestions;
pub mod tips;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::chart::{render_chart, ChartArtifact};
use crate::analysis::keywords::{extract_keywords, match_keywords};
use crate::analysis::similarity::compute_similarity;
use crate::analysis::suggestions::build_suggestion;
use crate::analysis::tips::{generate_ai_tips, AiTips};
use crate::errors::AppError;
use crate::state::AppState;

/// Raw text pulled from the uploaded resume and the submitted job description.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// 0.0 – 1.0
    pub similarity_score: f32,
    pub matched_keywords: Vec<String>,
    pub total_keywords: usize,
    /// 0.0 – 100.0; 0 when there are no keywords
    pub match_percentage: f64,
}

impl AnalysisResult {
    pub fn new(similarity_score: f32, matched_keywords: Vec<String>, total_keywords: usize) -> Self {
        let match_percentage = if total_keywords == 0 {
            0.0
        } else {
            100.0 * matched_keywords.len() as f64 / total_keywords as f64
        };

        Self {
            similarity_score,
            matched_keywords,
            total_keywords,
            match_percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImprovementTips {
    pub missing_keywords: Vec<String>,
    pub suggestion: String,
}

/// Everything the rendering layer needs for one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub resume_filename: Option<String>,
    pub result: AnalysisResult,
    pub improvement: ImprovementTips,
    pub ai_tips: AiTips,
    pub chart: ChartArtifact,
    pub similarity_backend: &'static str,
}

/// Runs the full pipeline for one request.
pub async fn analyze(
    state: &AppState,
    analysis_id: Uuid,
    resume_filename: Option<String>,
    input: &AnalysisInput,
) -> Result<AnalysisReport, AppError> {
    let keywords = extract_keywords(&input.job_description);
    let keyword_match = match_keywords(&input.resume_text, &keywords);
    info!(
        "Analysis {analysis_id}: {}/{} keywords matched",
        keyword_match.matched.len(),
        keywords.len()
    );

    let (similarity_score, similarity_backend) = compute_similarity(
        state.similarity.as_ref(),
        &input.resume_text,
        &input.job_description,
    )
    .await;
    info!("Analysis {analysis_id}: similarity {similarity_score:.3} via {similarity_backend}");

    let result = AnalysisResult::new(similarity_score, keyword_match.matched, keywords.len());

    let improvement = ImprovementTips {
        suggestion: build_suggestion(&keyword_match.missing),
        missing_keywords: keyword_match.missing,
    };

    let ai_tips = generate_ai_tips(
        &state.tips,
        &input.job_description,
        &improvement.missing_keywords,
        state.config.tips_max_tokens,
    )
    .await;
    info!("Analysis {analysis_id}: AI tips {:?}", ai_tips.status);

    let chart = render_chart(
        similarity_score,
        &result,
        &state.config.chart_path(),
        state.config.chart_url(),
    )?;

    Ok(AnalysisReport {
        analysis_id,
        analyzed_at: Utc::now(),
        resume_filename,
        result,
        improvement,
        ai_tips,
        chart,
        similarity_backend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::suggestions::ALL_KEYWORDS_COVERED;
    use crate::analysis::tips::{AiTipsStatus, TIPS_UNAVAILABLE};
    use crate::state::test_state;

    fn input(resume: &str, jd: &str) -> AnalysisInput {
        AnalysisInput {
            resume_text: resume.to_string(),
            job_description: jd.to_string(),
        }
    }

    #[test]
    fn test_match_percentage_zero_without_keywords() {
        let result = AnalysisResult::new(0.5, vec![], 0);
        assert_eq!(result.match_percentage, 0.0);
    }

    #[test]
    fn test_match_percentage_bounds() {
        assert_eq!(AnalysisResult::new(0.5, vec!["a".into()], 4).match_percentage, 25.0);
        assert_eq!(
            AnalysisResult::new(0.5, vec!["a".into(), "b".into()], 2).match_percentage,
            100.0
        );
    }

    #[tokio::test]
    async fn test_python_java_example() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let report = analyze(
            &state,
            Uuid::new_v4(),
            Some("resume.txt".to_string()),
            &input("I know Python and SQL", "Looking for Python and Java developer"),
        )
        .await
        .unwrap();

        assert_eq!(report.result.total_keywords, 2);
        assert_eq!(report.result.matched_keywords, vec!["python"]);
        assert_eq!(report.improvement.missing_keywords, vec!["java"]);
        assert_eq!(report.result.match_percentage, 50.0);
        assert!(report.improvement.suggestion.contains("java"));
        assert!((0.0..=1.0).contains(&report.result.similarity_score));
    }

    #[tokio::test]
    async fn test_matched_plus_missing_equals_total() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let jd = "Senior engineer: Rust, Tokio, Kafka, Postgres, Kubernetes, Terraform. \
                  You will own observability and incident response.";

        let report = analyze(&state, Uuid::new_v4(), None, &input("Rust and Postgres", jd))
            .await
            .unwrap();

        assert_eq!(
            report.result.matched_keywords.len() + report.improvement.missing_keywords.len(),
            report.result.total_keywords
        );
        assert!((0.0..=100.0).contains(&report.result.match_percentage));
    }

    #[tokio::test]
    async fn test_full_coverage_and_unavailable_tips() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let report = analyze(&state, Uuid::new_v4(), None, &input("python java", "Python Java"))
            .await
            .unwrap();

        assert_eq!(report.improvement.suggestion, ALL_KEYWORDS_COVERED);
        assert_eq!(report.ai_tips.status, AiTipsStatus::Unavailable);
        assert_eq!(report.ai_tips.tips, vec![TIPS_UNAVAILABLE.to_string()]);
    }

    #[tokio::test]
    async fn test_chart_written_after_run() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let report = analyze(&state, Uuid::new_v4(), None, &input("", ""))
            .await
            .unwrap();

        let metadata = std::fs::metadata(&report.chart.path).unwrap();
        assert!(metadata.len() > 0);
        assert_eq!(report.result.similarity_score, 0.0);
        assert_eq!(report.result.total_keywords, 0);
    }
}
