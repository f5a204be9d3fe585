// LLM prompt constants for the analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for interview-tip generation.
pub const TIPS_SYSTEM: &str = "You are an experienced technical recruiter and interview coach. \
    You give short, concrete, actionable advice to candidates preparing for an interview. \
    Never invent facts about the candidate.";

/// Tip generation prompt template.
/// Replace: {job_description}, {missing_keywords}, {format_instruction}
pub const TIPS_PROMPT_TEMPLATE: &str = r#"A candidate is applying for the role described below.
Their resume does not mention these keywords from the job description: {missing_keywords}

Write 3 to 5 interview preparation tips that help the candidate address those gaps,
for example how to talk about adjacent experience or what to study beforehand.

{format_instruction}

JOB DESCRIPTION:
{job_description}"#;
