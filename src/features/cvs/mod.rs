//! Legacy CV archive.
//!
//! Read-only view over CV rows imported from the old drop-CV convention,
//! which stored a raw path string (`file_url`) instead of a file record.
//! New CV uploads never land here; they create file records like everything
//! else. Admin-only, like the old CV listing screens.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CvArchiveService;
