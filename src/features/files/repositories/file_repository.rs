use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileRecord, FileType};
use crate::shared::types::PaginationQuery;

const SELECT_COLUMNS: &str = "SELECT id, file_name, original_name, url, file_path, size, \
     mime_type, file_type, uploaded_by, user_id, job_id, company_id, is_public, metadata, \
     created_at, updated_at FROM files";

/// Insert parameters for a new file record
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub file_name: String,
    pub original_name: String,
    pub url: String,
    pub file_path: String,
    pub size: i64,
    pub mime_type: String,
    pub file_type: FileType,
    pub uploaded_by: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub is_public: bool,
    pub metadata: serde_json::Value,
}

/// Typed filter set for listing files. Every field is optional; absent
/// fields put no constraint on the result.
#[derive(Debug, Default, Clone)]
pub struct FileQuery {
    pub file_type: Option<FileType>,
    pub user_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub uploaded_by: Option<Uuid>,
    pub is_public: Option<bool>,
    /// Restrict results to records the given user owns or uploaded.
    /// Set for non-admin callers on top of whatever filters they chose.
    pub scope_to_user: Option<Uuid>,
}

impl FileQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }

    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_job_id(mut self, job_id: Uuid) -> Self {
        self.job_id = Some(job_id);
        self
    }

    pub fn with_company_id(mut self, company_id: Uuid) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_uploaded_by(mut self, uploaded_by: Uuid) -> Self {
        self.uploaded_by = Some(uploaded_by);
        self
    }

    pub fn with_is_public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    pub fn scoped_to(mut self, user_id: Uuid) -> Self {
        self.scope_to_user = Some(user_id);
        self
    }

    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(file_type) = self.file_type {
            qb.push(" AND file_type = ").push_bind(file_type.as_str());
        }
        if let Some(user_id) = self.user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(job_id) = self.job_id {
            qb.push(" AND job_id = ").push_bind(job_id);
        }
        if let Some(company_id) = self.company_id {
            qb.push(" AND company_id = ").push_bind(company_id);
        }
        if let Some(uploaded_by) = self.uploaded_by {
            qb.push(" AND uploaded_by = ").push_bind(uploaded_by);
        }
        if let Some(is_public) = self.is_public {
            qb.push(" AND is_public = ").push_bind(is_public);
        }
        if let Some(scope) = self.scope_to_user {
            qb.push(" AND (user_id = ")
                .push_bind(scope)
                .push(" OR uploaded_by = ")
                .push_bind(scope)
                .push(")");
        }
    }
}

/// Typed update set for a file record. Only set fields are written;
/// `metadata_merge` is merged into the existing bag, not replaced.
#[derive(Debug, Default, Clone)]
pub struct FileChanges {
    pub original_name: Option<String>,
    pub is_public: Option<bool>,
    pub metadata_merge: Option<serde_json::Value>,
}

impl FileChanges {
    pub fn is_empty(&self) -> bool {
        self.original_name.is_none() && self.is_public.is_none() && self.metadata_merge.is_none()
    }
}

/// The only module that speaks SQL about files. Everything in and out is a
/// typed struct; callers never see the driver.
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: NewFileRecord) -> Result<FileRecord> {
        let record = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO files (
                file_name, original_name, url, file_path, size, mime_type, file_type,
                uploaded_by, user_id, job_id, company_id, is_public, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, file_name, original_name, url, file_path, size, mime_type,
                file_type, uploaded_by, user_id, job_id, company_id, is_public, metadata,
                created_at, updated_at
            "#,
        )
        .bind(&new.file_name)
        .bind(&new.original_name)
        .bind(&new.url)
        .bind(&new.file_path)
        .bind(new.size)
        .bind(&new.mime_type)
        .bind(new.file_type.as_str())
        .bind(new.uploaded_by)
        .bind(new.user_id)
        .bind(new.job_id)
        .bind(new.company_id)
        .bind(new.is_public)
        .bind(&new.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert file record: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(record)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let record =
            sqlx::query_as::<_, FileRecord>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch file record: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(record)
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<FileRecord>> {
        let records =
            sqlx::query_as::<_, FileRecord>(&format!("{} WHERE id = ANY($1)", SELECT_COLUMNS))
                .bind(ids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch file records: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(records)
    }

    /// List files matching the query, newest first.
    /// Returns (records, total_count).
    pub async fn list(
        &self,
        query: &FileQuery,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<FileRecord>, i64)> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM files WHERE 1=1");
        query.apply(&mut count_qb);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count file records: {:?}", e);
                AppError::Database(e)
            })?;

        let mut qb = QueryBuilder::new(format!("{} WHERE 1=1", SELECT_COLUMNS));
        query.apply(&mut qb);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let records = qb
            .build_query_as::<FileRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list file records: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((records, total))
    }

    /// Apply the given changes; returns the updated record, or None when the
    /// id does not exist. A no-op change set still bumps updated_at.
    pub async fn update(&self, id: Uuid, changes: FileChanges) -> Result<Option<FileRecord>> {
        let mut qb = QueryBuilder::new("UPDATE files SET updated_at = NOW()");

        if let Some(original_name) = &changes.original_name {
            qb.push(", original_name = ").push_bind(original_name);
        }
        if let Some(is_public) = changes.is_public {
            qb.push(", is_public = ").push_bind(is_public);
        }
        if let Some(metadata) = &changes.metadata_merge {
            qb.push(", metadata = metadata || ").push_bind(metadata);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(
            " RETURNING id, file_name, original_name, url, file_path, size, mime_type, \
             file_type, uploaded_by, user_id, job_id, company_id, is_public, metadata, \
             created_at, updated_at",
        );

        let record = qb
            .build_query_as::<FileRecord>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update file record: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(record)
    }

    /// Delete a record. Returns `false` when the id does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete file record: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every record whose url or recorded path matches one of the
    /// given logical references. Used by housekeeping so reclaimed files do
    /// not leave dangling rows.
    pub async fn delete_by_paths(&self, references: &[String]) -> Result<u64> {
        if references.is_empty() {
            return Ok(0);
        }

        let result =
            sqlx::query("DELETE FROM files WHERE url = ANY($1) OR file_path = ANY($1)")
                .bind(references)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete file records by path: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_filters_render_into_sql() {
        let query = FileQuery::new()
            .with_file_type(FileType::Cv)
            .with_job_id(Uuid::new_v4())
            .with_is_public(false)
            .scoped_to(Uuid::new_v4());

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM files WHERE 1=1");
        query.apply(&mut qb);
        let sql = qb.sql();

        assert!(sql.contains("file_type = $1"));
        assert!(sql.contains("job_id = $2"));
        assert!(sql.contains("is_public = $3"));
        assert!(sql.contains("(user_id = $4 OR uploaded_by = $5)"));
        assert!(!sql.contains("company_id"));
    }

    #[test]
    fn empty_query_adds_no_filters() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM files WHERE 1=1");
        FileQuery::new().apply(&mut qb);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM files WHERE 1=1");
    }

    #[test]
    fn change_set_emptiness() {
        assert!(FileChanges::default().is_empty());
        assert!(!FileChanges {
            is_public: Some(true),
            ..Default::default()
        }
        .is_empty());
    }
}
