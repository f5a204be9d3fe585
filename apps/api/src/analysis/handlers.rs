//! Axum route handlers for the analysis endpoints.

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{analyze, AnalysisInput, AnalysisReport};
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::render::{results_page, upload_page};
use crate::state::AppState;
use crate::uploads::save_upload;

const FILE_FIELD: &str = "file";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// The fields of the upload form, all present and non-empty.
#[derive(Debug)]
pub struct UploadForm {
    pub filename: String,
    pub data: Bytes,
    pub job_description: String,
}

/// Reads the multipart body. Unknown fields are ignored.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if !filename.is_empty() && !data.is_empty() {
                    file = Some((filename, data));
                }
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    job_description = Some(text);
                }
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;
    let job_description = job_description
        .ok_or_else(|| AppError::Validation("A job description is required".to_string()))?;

    Ok(UploadForm {
        filename,
        data,
        job_description,
    })
}

/// Stores the upload, extracts its text and runs the pipeline.
async fn run_analysis(state: &AppState, form: UploadForm) -> Result<AnalysisReport, AppError> {
    let analysis_id = Uuid::new_v4();
    info!("Analysis {analysis_id}: received '{}'", form.filename);

    save_upload(&state.config.upload_dir, analysis_id, &form.filename, &form.data).await?;
    let resume_text = extract_text(&form.filename, form.data).await?;

    let input = AnalysisInput {
        resume_text,
        job_description: form.job_description,
    };

    analyze(state, analysis_id, Some(form.filename), &input).await
}

/// POST /api/v1/analyze
///
/// Multipart form with `file` and `job_description`; returns the report as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let form = read_upload_form(multipart).await?;
    let report = run_analysis(&state, form).await?;
    Ok(Json(report))
}

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(upload_page(None))
}

/// POST /
///
/// Browser form submission. Errors re-render the form with a message.
pub async fn handle_index_submit(State(state): State<AppState>, multipart: Multipart) -> Response {
    let outcome = match read_upload_form(multipart).await {
        Ok(form) => run_analysis(&state, form).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(report) => Html(results_page(&report)).into_response(),
        Err(e) => {
            warn!("Form analysis failed: {e}");
            let page = upload_page(Some(&e.public_message()));
            (e.status(), Html(page)).into_response()
        }
    }
}
