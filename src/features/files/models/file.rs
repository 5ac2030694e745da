use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Database model for file metadata.
///
/// Decoupled from the bytes on disk: `url` is the logical reference clients
/// use, `file_path` is whatever the writing code path recorded at creation
/// time (absolute or root-relative). Readers normalize both through the path
/// resolver before touching the filesystem, and a row whose file is missing
/// on disk stays in place as a recoverable inconsistency.
#[derive(Debug, Clone, FromRow)]
pub struct FileRecord {
    pub id: Uuid,
    pub file_name: String,
    pub original_name: String,
    pub url: String,
    pub file_path: String,
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

/// What a file is to the job board. Decides the MIME allow-list, the target
/// subdirectory, and the default visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FileType {
    Cv,
    JobImage,
    CompanyLogo,
    ProfileImage,
    Document,
    Certificate,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Cv => "cv",
            FileType::JobImage => "job-image",
            FileType::CompanyLogo => "company-logo",
            FileType::ProfileImage => "profile-image",
            FileType::Document => "document",
            FileType::Certificate => "certificate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cv" => Some(FileType::Cv),
            "job-image" => Some(FileType::JobImage),
            "company-logo" => Some(FileType::CompanyLogo),
            "profile-image" => Some(FileType::ProfileImage),
            "document" => Some(FileType::Document),
            "certificate" => Some(FileType::Certificate),
            _ => None,
        }
    }

    /// Subdirectory under the storage root
    pub fn dir_name(&self) -> &'static str {
        match self {
            FileType::Cv => "cvs",
            FileType::JobImage => "job-images",
            FileType::CompanyLogo => "company-logos",
            FileType::ProfileImage => "profile-images",
            FileType::Document => "documents",
            FileType::Certificate => "certificates",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(
            self,
            FileType::JobImage | FileType::CompanyLogo | FileType::ProfileImage
        )
    }

    /// Images are served publicly by default; documents stay gated
    pub fn default_public(&self) -> bool {
        self.is_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_round_trips_through_strings() {
        for ft in [
            FileType::Cv,
            FileType::JobImage,
            FileType::CompanyLogo,
            FileType::ProfileImage,
            FileType::Document,
            FileType::Certificate,
        ] {
            assert_eq!(FileType::parse(ft.as_str()), Some(ft));
        }
        assert_eq!(FileType::parse("spreadsheet"), None);
    }

    #[test]
    fn image_types_default_to_public() {
        assert!(FileType::JobImage.default_public());
        assert!(FileType::CompanyLogo.default_public());
        assert!(!FileType::Cv.default_public());
        assert!(!FileType::Certificate.default_public());
    }
}
