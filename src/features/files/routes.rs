use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{
    delete_file, delete_files, download_file, get_file, list_files, run_cleanup, update_file,
    upload_file, UPLOAD_BODY_LIMIT,
};
use crate::features::files::services::{FileService, HousekeepingService};

/// Routes that require a session
pub fn protected_routes(
    file_service: Arc<FileService>,
    housekeeping_service: Arc<HousekeepingService>,
) -> Router {
    Router::new()
        .route(
            "/api/files/upload",
            // Allow body size up to the upload ceiling plus multipart overhead
            post(upload_file).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/files", get(list_files).delete(delete_files))
        .route(
            "/api/files/{id}",
            get(get_file).put(update_file).delete(delete_file),
        )
        .with_state(file_service)
        .merge(
            Router::new()
                .route("/api/files/cleanup", post(run_cleanup))
                .with_state(housekeeping_service),
        )
}

/// Download is routed publicly: public files need no session, gated files
/// are checked per record by the handler.
pub fn public_routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route("/api/files/download/{id}", get(download_file))
        .with_state(file_service)
}
