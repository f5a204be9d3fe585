use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Saves an uploaded resume as `<analysis_id>-<sanitized name>` under `dir`.
pub async fn save_upload(
    dir: &Path,
    analysis_id: Uuid,
    filename: &str,
    data: &[u8],
) -> Result<PathBuf, AppError> {
    let path = dir.join(format!("{analysis_id}-{}", sanitize_filename(filename)));
    tokio::fs::write(&path, data).await?;
    info!("Saved upload to {}", path.display());
    Ok(path)
}

/// Keeps the final path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('.');

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
