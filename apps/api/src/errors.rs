use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message that is safe to show to the end user.
    pub fn public_message(&self) -> String {
        self.parts().2
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::Multipart(e) => (e.status(), "MALFORMED_UPLOAD", e.body_text()),
            AppError::Extraction(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_ERROR",
                msg.clone(),
            ),
            AppError::Chart(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CHART_ERROR",
                "The results chart could not be rendered".to_string(),
            ),
            AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                "A storage error occurred".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Chart(msg) => tracing::error!("Chart error: {msg}"),
            AppError::Io(e) => tracing::error!("I/O error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => {}
        }

        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
