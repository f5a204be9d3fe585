pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Browser form
        .route(
            "/",
            get(handlers::handle_index).post(handlers::handle_index_submit),
        )
        // JSON API
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .nest_service("/static", static_files)
        // Resumes of any size are accepted
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
