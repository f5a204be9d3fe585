//! Keyword extraction and matching.
//!
//! Keywords are lowercased alphabetic tokens of the job description with
//! stop-words removed. A keyword matches when it occurs anywhere in the
//! resume text, ignoring case.

use std::collections::HashSet;

use serde::Serialize;

use crate::analysis::stopwords::is_stop_word;

/// Deduplicated keywords in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        KeywordSet(iter.into_iter().filter(|k| seen.insert(k.clone())).collect())
    }
}

/// Outcome of checking every keyword against the resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Splits text into lowercased, purely alphabetic tokens.
/// Whitespace and the joiners `/`, `-`, `:`, `|` separate tokens, so
/// `CI/CD` and `full-stack` each yield two. Surrounding punctuation is
/// trimmed; tokens with inner digits or symbols (`node.js`, `5+`) are dropped.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(is_token_separator)
        .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty() && token.chars().all(char::is_alphabetic))
        .map(str::to_lowercase)
}

fn is_token_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '/' | '-' | ':' | '|' | '\u{2013}' | '\u{2014}')
}

/// Tokens of `text` that survive the stop-word filter, duplicates kept.
pub fn content_terms(text: &str) -> impl Iterator<Item = String> + '_ {
    tokenize(text).filter(|token| !is_stop_word(token))
}

pub fn extract_keywords(job_description: &str) -> KeywordSet {
    content_terms(job_description).collect()
}

pub fn match_keywords(resume_text: &str, keywords: &KeywordSet) -> KeywordMatch {
    let resume_lower = resume_text.to_lowercase();
    let (matched, missing) = keywords
        .iter()
        .map(str::to_string)
        .partition(|keyword| resume_lower.contains(keyword.as_str()));

    KeywordMatch { matched, missing }
}
