use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::guards::RequireAdmin;
use crate::features::cvs::dtos::CvResponseDto;
use crate::features::cvs::services::CvArchiveService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List the legacy CV archive (admin)
#[utoipa::path(
    get,
    path = "/api/cvs",
    tag = "cvs",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Archived CVs", body = ApiResponse<Vec<CvResponseDto>>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn list_cvs(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CvArchiveService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<CvResponseDto>>>, AppError> {
    let (rows, total) = service.list(&pagination).await?;

    let items = rows.into_iter().map(CvResponseDto::from).collect();
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Download an archived CV (admin)
#[utoipa::path(
    get,
    path = "/api/cvs/{id}/download",
    tag = "cvs",
    params(("id" = Uuid, Path, description = "CV id")),
    responses(
        (status = 200, description = "CV bytes", content_type = "application/octet-stream"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Not found in archive or on disk")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn download_cv(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CvArchiveService>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let download = service.download(id).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(header::CONTENT_DISPOSITION, download.disposition)
        .header(header::CONTENT_LENGTH, download.bytes.len())
        .header(header::CACHE_CONTROL, "private")
        .body(Body::from(download.bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {}", e)))
}
