use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::cvs::{dtos as cvs_dtos, handlers as cvs_handlers};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers, models as files_models};
use crate::features::uploads::{dtos as uploads_dtos, handlers as uploads_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Files
        files_handlers::file_handler::upload_file,
        files_handlers::file_handler::list_files,
        files_handlers::file_handler::get_file,
        files_handlers::file_handler::download_file,
        files_handlers::file_handler::update_file,
        files_handlers::file_handler::delete_file,
        files_handlers::file_handler::delete_files,
        files_handlers::file_handler::run_cleanup,
        // Legacy upload surface
        uploads_handlers::upload,
        uploads_handlers::drop_cv,
        uploads_handlers::legacy_download,
        // Legacy CV archive
        cvs_handlers::list_cvs,
        cvs_handlers::download_cv,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Files
            files_models::FileType,
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::UpdateFileDto,
            files_dtos::DeleteFileResponseDto,
            files_dtos::BulkDeleteResponseDto,
            files_dtos::CleanupRequestDto,
            files_dtos::CleanupResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<Vec<files_dtos::FileResponseDto>>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
            ApiResponse<files_dtos::BulkDeleteResponseDto>,
            ApiResponse<files_dtos::CleanupResponseDto>,
            // Legacy upload surface
            uploads_dtos::LegacyUploadDto,
            uploads_dtos::DropCvDto,
            uploads_dtos::UploadUrlResponseDto,
            // Legacy CV archive
            cvs_dtos::CvResponseDto,
            ApiResponse<Vec<cvs_dtos::CvResponseDto>>,
        )
    ),
    tags(
        (name = "files", description = "File storage: upload, download, metadata, housekeeping"),
        (name = "uploads", description = "Legacy upload surface and raw-path downloads"),
        (name = "cvs", description = "Legacy CV archive (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Karira Storage API",
        version = "0.1.0",
        description = "File storage and retrieval API for the Karira job board",
    )
)]
pub struct ApiDoc;

/// Adds the bearer session-token security scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Opaque")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
