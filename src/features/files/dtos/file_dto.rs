use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::files::models::{FileRecord, FileType};

/// Maximum upload size in bytes (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Allowed MIME types for document-kind uploads (cv, document, certificate)
pub const ALLOWED_DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Allowed MIME types for image-kind uploads (job images, logos, avatars)
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// The allow-list that applies to a file type
pub fn allowed_mime_types(file_type: FileType) -> &'static [&'static str] {
    if file_type.is_image() {
        ALLOWED_IMAGE_MIME_TYPES
    } else {
        ALLOWED_DOCUMENT_MIME_TYPES
    }
}

/// Check if a MIME type is allowed for the given file type
pub fn is_mime_type_allowed(file_type: FileType, content_type: &str) -> bool {
    allowed_mime_types(file_type).contains(&content_type)
}

/// Upload request DTO for OpenAPI documentation.
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// File type discriminator: cv, job-image, company-logo, profile-image,
    /// document or certificate
    #[schema(example = "cv")]
    pub file_type: String,
    /// Subject user for the file (e.g. whose CV this is)
    pub user_id: Option<Uuid>,
    /// Job the file belongs to
    pub job_id: Option<Uuid>,
    /// Company the file belongs to
    pub company_id: Option<Uuid>,
    /// Override the default visibility of the file type
    pub is_public: Option<bool>,
}

/// Response DTO for file metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    pub id: Uuid,
    /// Generated on-disk name
    pub file_name: String,
    /// Original filename as uploaded
    pub original_name: String,
    /// Logical URL the file is retrievable under
    pub url: String,
    pub size: i64,
    pub mime_type: String,
    pub file_type: String,
    pub uploaded_by: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub is_public: bool,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponseDto {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            file_name: record.file_name,
            original_name: record.original_name,
            url: record.url,
            size: record.size,
            mime_type: record.mime_type,
            file_type: record.file_type,
            uploaded_by: record.uploaded_by,
            user_id: record.user_id,
            job_id: record.job_id,
            company_id: record.company_id,
            is_public: record.is_public,
            metadata: record.metadata,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Metadata update: rename, visibility change, metadata merge
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFileDto {
    /// New display name for the file
    #[validate(length(min = 1, max = 255, message = "original_name must be 1-255 characters"))]
    pub original_name: Option<String>,
    /// Change whether the file is downloadable without a session
    pub is_public: Option<bool>,
    /// Keys merged into the existing metadata bag
    pub metadata: Option<serde_json::Value>,
}

/// Filters for listing files. All fields optional; non-admins are scoped to
/// their own files regardless of what they pass.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FileListQuery {
    pub file_type: Option<FileType>,
    pub user_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub uploaded_by: Option<Uuid>,
    pub is_public: Option<bool>,
}

/// Disposition controls for downloads
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DownloadQuery {
    /// Force `attachment` disposition
    #[serde(default)]
    pub download: Option<bool>,
    /// Request `inline` disposition
    #[serde(default)]
    pub view: Option<bool>,
}

/// Bulk delete selector: comma-separated record ids
#[derive(Debug, Deserialize, IntoParams)]
pub struct BulkDeleteQuery {
    pub ids: String,
}

/// Housekeeping request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CleanupRequestDto {
    /// Logical directory to scan; must be under the public or legacy
    /// uploads prefix
    #[schema(example = "/uploads/cvs")]
    pub directory: String,
    /// Delete files strictly older than this many days
    #[serde(alias = "olderThanDays")]
    #[schema(example = 30.0)]
    pub older_than_days: f64,
}

/// Housekeeping result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CleanupResponseDto {
    pub directory: String,
    pub scanned_files: u64,
    pub deleted_files: u64,
    pub remaining_files: u64,
    /// Metadata rows removed alongside their files
    pub deleted_records: u64,
    /// Bytes reclaimed
    pub space_freed: u64,
    pub total_size_before: u64,
    pub total_size_after: u64,
}

/// Response DTO for single-file delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    pub deleted: bool,
    /// Whether the physical file was actually removed; `false` means it was
    /// already missing or the unlink failed (logged server-side)
    pub disk_file_removed: bool,
}

/// Response DTO for bulk delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteResponseDto {
    pub requested: u64,
    pub deleted: u64,
    /// Records that were missing or not owned by the caller
    pub skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_allow_list_accepts_pdf_and_word() {
        assert!(is_mime_type_allowed(FileType::Cv, "application/pdf"));
        assert!(is_mime_type_allowed(FileType::Document, "application/msword"));
        assert!(is_mime_type_allowed(
            FileType::Certificate,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ));
        assert!(!is_mime_type_allowed(FileType::Cv, "image/png"));
        assert!(!is_mime_type_allowed(FileType::Cv, "application/zip"));
    }

    #[test]
    fn image_allow_list_accepts_common_formats() {
        assert!(is_mime_type_allowed(FileType::JobImage, "image/jpeg"));
        assert!(is_mime_type_allowed(FileType::CompanyLogo, "image/webp"));
        assert!(!is_mime_type_allowed(FileType::JobImage, "application/pdf"));
        assert!(!is_mime_type_allowed(FileType::ProfileImage, "image/tiff"));
    }

    #[test]
    fn cleanup_request_accepts_camel_case_alias() {
        let dto: CleanupRequestDto =
            serde_json::from_str(r#"{"directory":"/uploads/cvs","olderThanDays":30}"#).unwrap();
        assert_eq!(dto.older_than_days, 30.0);

        let dto: CleanupRequestDto =
            serde_json::from_str(r#"{"directory":"/uploads/cvs","older_than_days":7.5}"#).unwrap();
        assert_eq!(dto.older_than_days, 7.5);
    }
}
