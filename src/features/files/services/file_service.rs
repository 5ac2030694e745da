use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    allowed_mime_types, is_mime_type_allowed, BulkDeleteResponseDto, DeleteFileResponseDto,
    DownloadQuery, FileListQuery, UpdateFileDto, MAX_FILE_SIZE,
};
use crate::features::files::models::{FileRecord, FileType};
use crate::features::files::repositories::{FileChanges, FileQuery, FileRepository, NewFileRecord};
use crate::modules::storage::{generate_file_name, LocalStorage};
use crate::shared::types::PaginationQuery;

/// Everything needed to store one uploaded file
pub struct UploadInput {
    pub data: Vec<u8>,
    pub original_name: String,
    pub content_type: String,
    pub file_type: FileType,
    pub uploaded_by: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    /// None means the file type's default visibility
    pub is_public: Option<bool>,
    pub metadata: serde_json::Value,
}

/// A file read back for an HTTP response
pub struct FileDownload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub disposition: String,
    /// Gated content is marked `Cache-Control: private`
    pub cache_private: bool,
}

/// Service for file operations: upload, download, metadata CRUD.
pub struct FileService {
    repository: FileRepository,
    storage: Arc<LocalStorage>,
}

impl FileService {
    pub fn new(repository: FileRepository, storage: Arc<LocalStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Validate, write bytes, record metadata.
    ///
    /// Nothing is written when validation fails. When the metadata insert
    /// fails after a successful disk write, the orphan file is unlinked
    /// before the error is returned.
    pub async fn upload(&self, input: UploadInput) -> Result<FileRecord> {
        if input.data.len() > MAX_FILE_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        if !is_mime_type_allowed(input.file_type, &input.content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed for {} uploads. Allowed types: {}",
                input.content_type,
                input.file_type.as_str(),
                allowed_mime_types(input.file_type).join(", ")
            )));
        }

        let is_public = input
            .is_public
            .unwrap_or_else(|| input.file_type.default_public());

        let file_name = generate_file_name(&input.original_name);
        let relative = format!("{}/{}", input.file_type.dir_name(), file_name);
        let resolver = self.storage.resolver();
        let url = if is_public {
            resolver.public_url(&relative)
        } else {
            resolver.private_path(&relative)
        };

        let physical = self.storage.write(&url, &input.data).await?;

        let new = NewFileRecord {
            file_name,
            original_name: input.original_name,
            url: url.clone(),
            file_path: physical.to_string_lossy().into_owned(),
            size: input.data.len() as i64,
            mime_type: input.content_type,
            file_type: input.file_type,
            uploaded_by: input.uploaded_by,
            user_id: input.user_id,
            job_id: input.job_id,
            company_id: input.company_id,
            is_public,
            metadata: input.metadata,
        };

        match self.repository.insert(new).await {
            Ok(record) => {
                info!(
                    "File stored: id={}, url={}, type={}, size={}, public={}",
                    record.id, record.url, record.file_type, record.size, record.is_public
                );
                Ok(record)
            }
            Err(e) => {
                // The bytes are on disk but the record is not: unlink the
                // orphan so the pair stays consistent.
                match self.storage.remove(&url).await {
                    Ok(_) => warn!("Removed orphan file {} after failed metadata insert", url),
                    Err(cleanup_err) => warn!(
                        "Failed to remove orphan file {} after failed metadata insert: {}",
                        url, cleanup_err
                    ),
                }
                Err(e)
            }
        }
    }

    /// Download a file by record id, enforcing the visibility rules.
    pub async fn download(
        &self,
        id: Uuid,
        requester: Option<&AuthenticatedUser>,
        options: &DownloadQuery,
    ) -> Result<FileDownload> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        Self::authorize(&record, requester)?;

        let reference = Self::storage_reference(&record);
        if !self.storage.exists(reference).await? {
            // Distinct from the missing-record 404: the row exists but the
            // bytes are gone, which is an operational inconsistency. The
            // record is kept for reconciliation.
            warn!(
                "File record {} has no file on disk (reference '{}')",
                record.id, reference
            );
            return Err(AppError::NotFound("File not found on disk".to_string()));
        }
        let bytes = self
            .storage
            .read(reference)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found on disk".to_string()))?;

        let inline = options.view.unwrap_or(false) || record.mime_type.starts_with("image/");
        let kind = if options.download.unwrap_or(false) {
            "attachment"
        } else if inline {
            "inline"
        } else {
            "attachment"
        };

        // Percent-encode so non-ASCII original names survive the header
        let encoded_name = urlencoding::encode(&record.original_name).into_owned();

        Ok(FileDownload {
            bytes,
            content_type: Self::content_type_for(&record),
            disposition: format!("{}; filename=\"{}\"", kind, encoded_name),
            cache_private: !record.is_public,
        })
    }

    /// Metadata read with the same access rule as download
    pub async fn get_metadata(&self, id: Uuid, requester: &AuthenticatedUser) -> Result<FileRecord> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        Self::authorize(&record, Some(requester))?;
        Ok(record)
    }

    /// List files. Admins see everything; other callers are scoped to the
    /// records they own or uploaded, on top of the filters they chose.
    pub async fn list(
        &self,
        filters: &FileListQuery,
        pagination: &PaginationQuery,
        requester: &AuthenticatedUser,
    ) -> Result<(Vec<FileRecord>, i64)> {
        let mut query = FileQuery::new();
        if let Some(file_type) = filters.file_type {
            query = query.with_file_type(file_type);
        }
        if let Some(user_id) = filters.user_id {
            query = query.with_user_id(user_id);
        }
        if let Some(job_id) = filters.job_id {
            query = query.with_job_id(job_id);
        }
        if let Some(company_id) = filters.company_id {
            query = query.with_company_id(company_id);
        }
        if let Some(uploaded_by) = filters.uploaded_by {
            query = query.with_uploaded_by(uploaded_by);
        }
        if let Some(is_public) = filters.is_public {
            query = query.with_is_public(is_public);
        }
        if !requester.is_admin() {
            query = query.scoped_to(requester.id);
        }

        self.repository.list(&query, pagination).await
    }

    /// Rename, visibility change, metadata merge
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateFileDto,
        requester: &AuthenticatedUser,
    ) -> Result<FileRecord> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        Self::authorize(&record, Some(requester))?;

        let changes = FileChanges {
            original_name: dto.original_name,
            is_public: dto.is_public,
            metadata_merge: dto.metadata,
        };
        if changes.is_empty() {
            return Err(AppError::BadRequest("Nothing to update".to_string()));
        }

        self.repository
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    /// Delete a file record and its bytes.
    ///
    /// The unlink is best-effort: a missing or undeletable disk file is
    /// logged as a warning and the metadata delete still proceeds.
    pub async fn delete(
        &self,
        id: Uuid,
        requester: &AuthenticatedUser,
    ) -> Result<DeleteFileResponseDto> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        Self::authorize(&record, Some(requester))?;

        let disk_file_removed = self.unlink_best_effort(&record).await;
        self.repository.delete(id).await?;

        info!(
            "File deleted: id={}, url={}, disk_file_removed={}",
            record.id, record.url, disk_file_removed
        );

        Ok(DeleteFileResponseDto {
            deleted: true,
            disk_file_removed,
        })
    }

    /// Bulk delete. Records that are missing or not accessible to the
    /// caller are skipped, not errors; each deletion is best-effort like
    /// the single-file path.
    pub async fn delete_many(
        &self,
        ids: &[Uuid],
        requester: &AuthenticatedUser,
    ) -> Result<BulkDeleteResponseDto> {
        let records = self.repository.find_by_ids(ids).await?;

        let mut deleted = 0u64;
        for record in &records {
            if Self::authorize(record, Some(requester)).is_err() {
                continue;
            }
            self.unlink_best_effort(record).await;
            if self.repository.delete(record.id).await? {
                deleted += 1;
            }
        }

        let requested = ids.len() as u64;
        Ok(BulkDeleteResponseDto {
            requested,
            deleted,
            skipped: requested - deleted,
        })
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Public records need no session; gated records require the subject
    /// user, the uploader, or an admin.
    fn authorize(record: &FileRecord, requester: Option<&AuthenticatedUser>) -> Result<()> {
        if record.is_public {
            return Ok(());
        }

        let user = requester
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let owns = record.user_id == Some(user.id) || record.uploaded_by == Some(user.id);
        if user.is_admin() || owns {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You do not have permission to access this file".to_string(),
            ))
        }
    }

    /// The logical reference to hand the storage layer. Some historical
    /// records carry only a url, no recorded path.
    fn storage_reference(record: &FileRecord) -> &str {
        if record.file_path.is_empty() {
            &record.url
        } else {
            &record.file_path
        }
    }

    fn content_type_for(record: &FileRecord) -> String {
        if record.mime_type.is_empty() {
            // Legacy rows without a stored type: infer from the extension
            mime_guess::from_path(&record.file_name)
                .first_or_octet_stream()
                .to_string()
        } else {
            record.mime_type.clone()
        }
    }

    async fn unlink_best_effort(&self, record: &FileRecord) -> bool {
        let reference = Self::storage_reference(record);
        match self.storage.remove(reference).await {
            Ok(true) => true,
            Ok(false) => {
                warn!(
                    "File {} was already missing on disk (reference '{}')",
                    record.id, reference
                );
                false
            }
            Err(e) => {
                warn!(
                    "Failed to unlink file {} (reference '{}'): {}; metadata delete proceeds",
                    record.id, reference, e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_admin_user, create_candidate_user};
    use chrono::Utc;

    fn record(is_public: bool, user_id: Option<Uuid>, uploaded_by: Option<Uuid>) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            file_name: "170000-cv.pdf".into(),
            original_name: "cv.pdf".into(),
            url: "storage/uploads/cvs/170000-cv.pdf".into(),
            file_path: String::new(),
            size: 1024,
            mime_type: "application/pdf".into(),
            file_type: "cv".into(),
            uploaded_by,
            user_id,
            job_id: None,
            company_id: None,
            is_public,
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn public_records_need_no_session() {
        let r = record(true, None, None);
        assert!(FileService::authorize(&r, None).is_ok());
    }

    #[test]
    fn gated_records_without_session_are_unauthorized() {
        let r = record(false, None, None);
        assert!(matches!(
            FileService::authorize(&r, None),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn gated_records_allow_subject_uploader_and_admin() {
        let subject = create_candidate_user();
        let uploader = create_candidate_user();
        let stranger = create_candidate_user();
        let admin = create_admin_user();

        let r = record(false, Some(subject.id), Some(uploader.id));
        assert!(FileService::authorize(&r, Some(&subject)).is_ok());
        assert!(FileService::authorize(&r, Some(&uploader)).is_ok());
        assert!(FileService::authorize(&r, Some(&admin)).is_ok());
        assert!(matches!(
            FileService::authorize(&r, Some(&stranger)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn storage_reference_prefers_recorded_path() {
        let mut r = record(false, None, None);
        assert_eq!(FileService::storage_reference(&r), r.url);
        r.file_path = "/srv/app/storage/uploads/cvs/170000-cv.pdf".into();
        assert_eq!(
            FileService::storage_reference(&r),
            "/srv/app/storage/uploads/cvs/170000-cv.pdf"
        );
    }

    #[test]
    fn legacy_rows_get_inferred_content_type() {
        let mut r = record(true, None, None);
        r.mime_type = String::new();
        assert_eq!(FileService::content_type_for(&r), "application/pdf");
        r.file_name = "photo.png".into();
        assert_eq!(FileService::content_type_for(&r), "image/png");
    }
}
