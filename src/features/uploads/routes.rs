use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::UPLOAD_BODY_LIMIT;
use crate::features::files::services::FileService;
use crate::features::uploads::handlers::{drop_cv, legacy_download, upload};
use crate::modules::storage::LocalStorage;

/// Legacy generic upload, session required
pub fn protected_routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/upload",
            post(upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .with_state(file_service)
}

/// Drop-CV funnel and legacy raw-path downloads, no session
pub fn public_routes(file_service: Arc<FileService>, storage: Arc<LocalStorage>) -> Router {
    Router::new()
        .route(
            "/api/drop-cv",
            post(drop_cv).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .with_state(file_service)
        .merge(
            Router::new()
                .route("/uploads/{*path}", get(legacy_download))
                .with_state(storage),
        )
}
