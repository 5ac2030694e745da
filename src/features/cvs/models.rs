use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Legacy CV row. `file_url` is a raw path string in whatever convention the
/// old uploader used; the path resolver normalizes it at read time.
#[derive(Debug, Clone, FromRow)]
pub struct Cv {
    pub id: Uuid,
    pub candidate_name: String,
    pub email: String,
    pub file_url: String,
    pub original_name: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
