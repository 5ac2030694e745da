use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::models::FileType;
use crate::features::files::services::{FileService, UploadInput};
use crate::features::uploads::dtos::{DropCvDto, LegacyUploadDto, UploadUrlResponseDto};
use crate::modules::storage::LocalStorage;

/// Legacy generic upload
///
/// Multipart fields: `file`, `type` (`cv` or `job-image`), optional `jobId`.
/// Returns the bare `{ url }` shape the old clients expect; a full file
/// record is created underneath.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "uploads",
    request_body(
        content = LegacyUploadDto,
        content_type = "multipart/form-data",
        description = "Legacy upload form",
    ),
    responses(
        (status = 200, description = "Uploaded", body = UploadUrlResponseDto),
        (status = 400, description = "Invalid type, MIME type not allowed, or file too large"),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn upload(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadUrlResponseDto>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut upload_type: Option<String> = None;
    let mut job_id: Option<Uuid> = None;

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
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                file_name = Some(fname);
                content_type = Some(ct);
            }
            "type" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read type field: {}", e))
                })?;
                upload_type = Some(text);
            }
            "jobId" | "job_id" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read jobId field: {}", e))
                })?;
                job_id = Some(
                    Uuid::parse_str(text.trim())
                        .map_err(|_| AppError::BadRequest("jobId must be a valid UUID".into()))?,
                );
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
    let upload_type =
        upload_type.ok_or_else(|| AppError::BadRequest("type is required".to_string()))?;

    // The legacy surface only ever supported these two kinds
    let (file_type, user_id) = match upload_type.as_str() {
        "cv" => (FileType::Cv, Some(user.id)),
        "job-image" => (FileType::JobImage, None),
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown upload type '{}'. Expected 'cv' or 'job-image'",
                other
            )));
        }
    };

    let record = service
        .upload(UploadInput {
            data: file_data,
            original_name: file_name,
            content_type,
            file_type,
            uploaded_by: Some(user.id),
            user_id,
            job_id,
            company_id: None,
            is_public: None,
            metadata: serde_json::json!({}),
        })
        .await?;

    Ok(Json(UploadUrlResponseDto { url: record.url }))
}

/// Drop-CV funnel
///
/// Unauthenticated CV submission from the landing page: `file`, `name`,
/// `email`. The candidate details land in the record's metadata bag.
#[utoipa::path(
    post,
    path = "/api/drop-cv",
    tag = "uploads",
    request_body(
        content = DropCvDto,
        content_type = "multipart/form-data",
        description = "Drop-CV form",
    ),
    responses(
        (status = 200, description = "CV stored", body = UploadUrlResponseDto),
        (status = 400, description = "Missing fields, bad e-mail, MIME type not allowed, or file too large")
    )
)]
pub async fn drop_cv(
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadUrlResponseDto>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut name: Option<String> = None;
    let mut email: Option<String> = None;

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
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                file_name = Some(fname);
                content_type = Some(ct);
            }
            "name" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read name field: {}", e))
                })?;
                if !text.trim().is_empty() {
                    name = Some(text.trim().to_string());
                }
            }
            "email" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read email field: {}", e))
                })?;
                if !text.trim().is_empty() {
                    email = Some(text.trim().to_string());
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
    let name = name.ok_or_else(|| AppError::BadRequest("name is required".to_string()))?;
    let email = email.ok_or_else(|| AppError::BadRequest("email is required".to_string()))?;

    if !email.validate_email() {
        return Err(AppError::BadRequest(format!(
            "'{}' is not a valid e-mail address",
            email
        )));
    }

    let record = service
        .upload(UploadInput {
            data: file_data,
            original_name: file_name,
            content_type,
            file_type: FileType::Cv,
            uploaded_by: None,
            user_id: None,
            job_id: None,
            company_id: None,
            is_public: Some(false),
            metadata: serde_json::json!({
                "candidate_name": name,
                "email": email,
                "source": "drop-cv",
            }),
        })
        .await?;

    Ok(Json(UploadUrlResponseDto { url: record.url }))
}

/// Serve a file from the legacy public uploads root
///
/// These files predate the metadata store, so there is no record to consult:
/// the content type is inferred from the extension and everything under the
/// legacy root is public by definition.
#[utoipa::path(
    get,
    path = "/uploads/{path}",
    tag = "uploads",
    params(("path" = String, Path, description = "Path under the legacy uploads root")),
    responses(
        (status = 200, description = "File bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Malformed path"),
        (status = 404, description = "File not found on disk")
    )
)]
pub async fn legacy_download(
    State(storage): State<Arc<LocalStorage>>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    // The resolver normalizes prefixes but the wildcard is raw client input:
    // refuse anything that walks out of the root.
    if path.split('/').any(|segment| segment == "..") {
        return Err(AppError::BadRequest("Malformed path".to_string()));
    }

    let logical = format!("/uploads/{}", path);
    let bytes = storage
        .read(&logical)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let content_type = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();

    let file_name = path.rsplit('/').next().unwrap_or(&path);
    let kind = if content_type.starts_with("image/") {
        "inline"
    } else {
        "attachment"
    };
    let disposition = format!("{}; filename=\"{}\"", kind, urlencoding::encode(file_name));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build download response: {}", e)))
}
