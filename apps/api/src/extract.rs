//! Text extraction from uploaded resume files.

use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    /// Detects the format from the file extension.
    pub fn from_filename(filename: &str) -> Result<Self, AppError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(ResumeFormat::Pdf),
            "txt" | "text" | "md" => Ok(ResumeFormat::PlainText),
            "" => Err(AppError::UnsupportedMediaType(format!(
                "'{filename}' has no file extension; upload a .pdf or .txt resume"
            ))),
            other => Err(AppError::UnsupportedMediaType(format!(
                ".{other} files are not supported; upload a .pdf or .txt resume"
            ))),
        }
    }
}

/// Extracts the plain text of a resume. PDF parsing runs on the blocking pool.
pub async fn extract_text(filename: &str, data: Bytes) -> Result<String, AppError> {
    let format = ResumeFormat::from_filename(filename)?;

    let text = match format {
        ResumeFormat::PlainText => String::from_utf8_lossy(&data).into_owned(),
        ResumeFormat::Pdf => tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data)
                .map_err(|e| AppError::Extraction(format!("Could not read PDF: {e}")))
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))??,
    };

    if text.trim().is_empty() {
        return Err(AppError::Extraction(format!(
            "No extractable text found in '{filename}'"
        )));
    }

    debug!("Extracted {} characters from {filename}", text.len());
    Ok(text)
}
