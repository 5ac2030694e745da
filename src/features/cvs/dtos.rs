use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::cvs::models::Cv;

/// Legacy CV listing entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CvResponseDto {
    pub id: Uuid,
    pub candidate_name: String,
    pub email: String,
    pub file_url: String,
    pub original_name: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Cv> for CvResponseDto {
    fn from(cv: Cv) -> Self {
        Self {
            id: cv.id,
            candidate_name: cv.candidate_name,
            email: cv.email,
            file_url: cv.file_url,
            original_name: cv.original_name,
            user_id: cv.user_id,
            created_at: cv.created_at,
        }
    }
}
