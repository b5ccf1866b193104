//! Route definitions for the HTTP service.

mod exam;
mod extract;
mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Extraction
        .route("/extract_text/", post(extract::extract_text))
        .route("/extract_document/", post(extract::extract_document))
        // Exam bundles
        .route("/exam_package/", post(exam::exam_package))
        .layer(body_limit)
        .with_state(state)
}
