use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Legacy upload response: just the logical URL
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadUrlResponseDto {
    pub url: String,
}

/// Legacy upload request for OpenAPI documentation.
/// Note: the handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct LegacyUploadDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Upload kind: "cv" or "job-image"
    #[schema(example = "cv")]
    pub r#type: String,
    /// Job the image belongs to (job-image uploads)
    pub job_id: Option<uuid::Uuid>,
}

/// Drop-CV funnel request for OpenAPI documentation.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct DropCvDto {
    /// The CV file
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Candidate name
    pub name: String,
    /// Candidate contact e-mail
    pub email: String,
}
