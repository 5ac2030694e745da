use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::cvs::handlers::{download_cv, list_cvs};
use crate::features::cvs::services::CvArchiveService;

/// Create routes for the legacy CV archive
///
/// Note: admin-only, mounted behind the auth middleware
pub fn routes(service: Arc<CvArchiveService>) -> Router {
    Router::new()
        .route("/api/cvs", get(list_cvs))
        .route("/api/cvs/{id}/download", get(download_cv))
        .with_state(service)
}
