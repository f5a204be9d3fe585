//! AI interview tips — optional, degrades to a single notice when the
//! text-generation capability is absent or the call fails.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::prompts::{TIPS_PROMPT_TEMPLATE, TIPS_SYSTEM};
use crate::llm_client::prompts::ONE_ITEM_PER_LINE;
use crate::llm_client::TextGenerator;

pub const TIPS_UNAVAILABLE: &str =
    "AI tips are unavailable: no text-generation model is configured.";
pub const TIPS_NOT_NEEDED: &str =
    "Your resume already covers every keyword in this job description. Focus on concrete examples of your impact.";
pub const TIPS_FAILED: &str = "AI tips could not be generated for this analysis. Please try again later.";

/// Whether text generation can be used. Decided once at startup.
#[derive(Clone)]
pub enum TipsCapability {
    Available(Arc<dyn TextGenerator>),
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiTipsStatus {
    Generated,
    NotNeeded,
    Unavailable,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiTips {
    pub status: AiTipsStatus,
    pub tips: Vec<String>,
}

impl AiTips {
    fn single(status: AiTipsStatus, message: &str) -> Self {
        Self {
            status,
            tips: vec![message.to_string()],
        }
    }
}

pub async fn generate_ai_tips(
    capability: &TipsCapability,
    job_description: &str,
    missing: &[String],
    max_tokens: u32,
) -> AiTips {
    let generator = match capability {
        TipsCapability::Available(generator) => generator,
        TipsCapability::Unavailable => {
            return AiTips::single(AiTipsStatus::Unavailable, TIPS_UNAVAILABLE)
        }
    };

    if missing.is_empty() {
        return AiTips::single(AiTipsStatus::NotNeeded, TIPS_NOT_NEEDED);
    }

    let prompt = build_tips_prompt(job_description, missing);

    match generator.generate(&prompt, TIPS_SYSTEM, max_tokens).await {
        Ok(text) => {
            let tips = split_tips(&text);
            if tips.is_empty() {
                warn!("Tip generation returned only blank lines");
                return AiTips::single(AiTipsStatus::Failed, TIPS_FAILED);
            }
            info!("Generated {} AI tips", tips.len());
            AiTips {
                status: AiTipsStatus::Generated,
                tips,
            }
        }
        Err(e) => {
            warn!("Tip generation failed: {e}");
            AiTips::single(AiTipsStatus::Failed, TIPS_FAILED)
        }
    }
}

fn build_tips_prompt(job_description: &str, missing: &[String]) -> String {
    TIPS_PROMPT_TEMPLATE
        .replace("{missing_keywords}", &missing.join(", "))
        .replace("{format_instruction}", ONE_ITEM_PER_LINE)
        .replace("{job_description}", job_description.trim())
}

/// One tip per non-blank line, with list markers ("-", "*", "1.", "2)") removed.
fn split_tips(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        return rest.trim_start();
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    line
}
