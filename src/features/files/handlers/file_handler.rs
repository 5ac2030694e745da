use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::{AppJson, OptionalUser};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    BulkDeleteQuery, BulkDeleteResponseDto, CleanupRequestDto, CleanupResponseDto,
    DeleteFileResponseDto, DownloadQuery, FileListQuery, FileResponseDto, UpdateFileDto,
    UploadFileDto, MAX_FILE_SIZE,
};
use crate::features::files::models::FileType;
use crate::features::files::services::{FileService, HousekeepingService, UploadInput};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Upload a file and create its metadata record
///
/// Accepts multipart/form-data with:
/// - `file`: the file to upload (required)
/// - `file_type`: cv, job-image, company-logo, profile-image, document, certificate (required)
/// - `user_id`, `job_id`, `company_id`: optional subject entities
/// - `is_public`: optional visibility override
/// - `metadata`: optional JSON object merged into the metadata bag
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form with a type discriminator and optional subject ids",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Invalid file, type not allowed, or file too large"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>), AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut file_type: Option<String> = None;
    let mut user_id: Option<Uuid> = None;
    let mut job_id: Option<Uuid> = None;
    let mut company_id: Option<Uuid> = None;
    let mut is_public: Option<bool> = None;
    let mut metadata: Option<serde_json::Value> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let ct = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let fname = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                file_name = Some(fname);
                content_type = Some(ct);
            }
            "file_type" | "type" => {
                file_type = Some(read_text_field(field, "file_type").await?);
            }
            "user_id" | "userId" => {
                user_id = Some(read_uuid_field(field, "user_id").await?);
            }
            "job_id" | "jobId" => {
                job_id = Some(read_uuid_field(field, "job_id").await?);
            }
            "company_id" | "companyId" => {
                company_id = Some(read_uuid_field(field, "company_id").await?);
            }
            "is_public" | "isPublic" => {
                let text = read_text_field(field, "is_public").await?;
                is_public = Some(matches!(text.to_lowercase().as_str(), "true" | "1"));
            }
            "metadata" => {
                let text = read_text_field(field, "metadata").await?;
                if !text.is_empty() {
                    let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
                        AppError::BadRequest(format!("metadata must be valid JSON: {}", e))
                    })?;
                    metadata = Some(value);
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::BadRequest("Filename is required".to_string()))?;
    let content_type =
        content_type.ok_or_else(|| AppError::BadRequest("Content type is required".to_string()))?;
    let file_type = file_type
        .ok_or_else(|| AppError::BadRequest("file_type is required".to_string()))
        .and_then(|t| {
            FileType::parse(&t)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown file type '{}'", t)))
        })?;

    let record = service
        .upload(UploadInput {
            data: file_data,
            original_name: file_name,
            content_type,
            file_type,
            uploaded_by: Some(user.id),
            user_id,
            job_id,
            company_id,
            is_public,
            metadata: metadata.unwrap_or_else(|| serde_json::json!({})),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(FileResponseDto::from(record))),
    ))
}

/// List file metadata with typed filters
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(FileListQuery, PaginationQuery),
    responses(
        (status = 200, description = "Matching files", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Query(filters): Query<FileListQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>, AppError> {
    let (records, total) = service.list(&filters, &pagination, &user).await?;

    let items = records.into_iter().map(FileResponseDto::from).collect();
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Read file metadata by id
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File record id")),
    responses(
        (status = 200, description = "File metadata", body = ApiResponse<FileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner, uploader, or an admin"),
        (status = 404, description = "File not found")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn get_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    let record = service.get_metadata(id, &user).await?;
    Ok(Json(ApiResponse::ok(FileResponseDto::from(record))))
}

/// Download a file by record id
///
/// Public files need no session. Gated files require the subject user, the
/// uploader, or an admin. `download=true` forces attachment disposition;
/// `view=true` requests inline.
#[utoipa::path(
    get,
    path = "/api/files/download/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File record id"),
        DownloadQuery
    ),
    responses(
        (status = 200, description = "File bytes", content_type = "application/octet-stream"),
        (status = 401, description = "Session required for this file"),
        (status = 403, description = "Not the owner, uploader, or an admin"),
        (status = 404, description = "Not found in metadata store or on disk")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn download_file(
    OptionalUser(user): OptionalUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
    Query(options): Query<DownloadQuery>,
) -> Result<Response, AppError> {
    let download = service.download(id, user.as_ref(), &options).await?;

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.content_type)
        .header(header::CONTENT_DISPOSITION, download.disposition)
        .header(header::CONTENT_LENGTH, download.bytes.len());
    if download.cache_private {
        builder = builder.header(header::CACHE_CONTROL, "private");
    }

    builder
        .body(Body::from(download.bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {}", e)))
}

/// Update file metadata: rename, visibility, metadata merge
#[utoipa::path(
    put,
    path = "/api/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File record id")),
    request_body = UpdateFileDto,
    responses(
        (status = 200, description = "Updated metadata", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Validation error or empty change set"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner, uploader, or an admin"),
        (status = 404, description = "File not found")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn update_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateFileDto>,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let record = service.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::ok(FileResponseDto::from(record))))
}

/// Delete a file and its metadata
///
/// The physical unlink is best-effort; the metadata row is removed even if
/// the file was already missing on disk.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File record id")),
    responses(
        (status = 200, description = "File deleted", body = ApiResponse<DeleteFileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the owner, uploader, or an admin"),
        (status = 404, description = "File not found")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn delete_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>, AppError> {
    let result = service.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("File deleted successfully".to_string()),
        None,
    )))
}

/// Bulk delete by comma-separated record ids
#[utoipa::path(
    delete,
    path = "/api/files",
    tag = "files",
    params(BulkDeleteQuery),
    responses(
        (status = 200, description = "Per-item outcome counts", body = ApiResponse<BulkDeleteResponseDto>),
        (status = 400, description = "Missing or malformed ids"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn delete_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Query(query): Query<BulkDeleteQuery>,
) -> Result<Json<ApiResponse<BulkDeleteResponseDto>>, AppError> {
    let ids = query
        .ids
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| AppError::BadRequest(format!("Invalid file id '{}'", s)))
        })
        .collect::<Result<Vec<Uuid>, AppError>>()?;

    if ids.is_empty() {
        return Err(AppError::BadRequest("ids is required".to_string()));
    }

    let result = service.delete_many(&ids, &user).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// Reclaim disk space (admin)
///
/// Deletes files older than the threshold under a public or legacy uploads
/// directory, together with their metadata rows.
#[utoipa::path(
    post,
    path = "/api/files/cleanup",
    tag = "files",
    request_body = CleanupRequestDto,
    responses(
        (status = 200, description = "Cleanup report", body = ApiResponse<CleanupResponseDto>),
        (status = 400, description = "Invalid directory or non-positive threshold"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Directory not found")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn run_cleanup(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<HousekeepingService>>,
    AppJson(dto): AppJson<CleanupRequestDto>,
) -> Result<Json<ApiResponse<CleanupResponseDto>>, AppError> {
    let report = service.reclaim(&dto.directory, dto.older_than_days).await?;
    Ok(Json(ApiResponse::ok(report)))
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

async fn read_uuid_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<Uuid, AppError> {
    let text = read_text_field(field, name).await?;
    Uuid::parse_str(text.trim())
        .map_err(|_| AppError::BadRequest(format!("{} must be a valid UUID", name)))
}

// Body limit shared by the upload routes: the file ceiling plus room for
// multipart framing and the other fields.
pub const UPLOAD_BODY_LIMIT: usize = MAX_FILE_SIZE + 1024 * 1024;
