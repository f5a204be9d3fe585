/// Shown when the resume already contains every job-description keyword.
pub const ALL_KEYWORDS_COVERED: &str =
    "Great job! Your resume covers all the key terms from the job description.";

/// Builds a human-readable suggestion from the keywords the resume lacks.
pub fn build_suggestion(missing: &[String]) -> String {
    if missing.is_empty() {
        ALL_KEYWORDS_COVERED.to_string()
    } else {
        format!(
            "Consider adding these keywords to your resume: {}",
            missing.join(", ")
        )
    }
}
