use std::sync::Arc;

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::cvs::models::Cv;
use crate::features::files::services::FileDownload;
use crate::modules::storage::LocalStorage;
use crate::shared::types::PaginationQuery;

/// Read-only service over the legacy CV archive
pub struct CvArchiveService {
    pool: PgPool,
    storage: Arc<LocalStorage>,
}

impl CvArchiveService {
    pub fn new(pool: PgPool, storage: Arc<LocalStorage>) -> Self {
        Self { pool, storage }
    }

    /// List archived CVs, newest first. Returns (rows, total_count).
    pub async fn list(&self, pagination: &PaginationQuery) -> Result<(Vec<Cv>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cvs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count CVs: {:?}", e);
                AppError::Database(e)
            })?;

        let rows = sqlx::query_as::<_, Cv>(
            r#"
            SELECT id, candidate_name, email, file_url, original_name, user_id, created_at
            FROM cvs
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list CVs: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((rows, total))
    }

    /// Read an archived CV's bytes.
    ///
    /// The raw `file_url` string is special-cased through the path resolver;
    /// there is no metadata row to consult, so the content type comes from
    /// the extension.
    pub async fn download(&self, id: Uuid) -> Result<FileDownload> {
        let cv = sqlx::query_as::<_, Cv>(
            r#"
            SELECT id, candidate_name, email, file_url, original_name, user_id, created_at
            FROM cvs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch CV: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("CV not found".to_string()))?;

        let bytes = self.storage.read(&cv.file_url).await?.ok_or_else(|| {
            warn!(
                "CV {} has no file on disk (reference '{}')",
                cv.id, cv.file_url
            );
            AppError::NotFound("File not found on disk".to_string())
        })?;

        let display_name = cv
            .original_name
            .clone()
            .unwrap_or_else(|| basename(&cv.file_url).to_string());

        Ok(FileDownload {
            bytes,
            content_type: mime_guess::from_path(&cv.file_url)
                .first_or_octet_stream()
                .to_string(),
            disposition: format!(
                "attachment; filename=\"{}\"",
                urlencoding::encode(&display_name)
            ),
            cache_private: true,
        })
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_directories() {
        assert_eq!(basename("/uploads/cvs/170000-cv.pdf"), "170000-cv.pdf");
        assert_eq!(basename("bare.pdf"), "bare.pdf");
    }
}
