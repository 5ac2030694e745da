mod file_service;
mod housekeeping_service;

pub use file_service::{FileDownload, FileService, UploadInput};
pub use housekeeping_service::HousekeepingService;
