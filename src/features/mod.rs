pub mod auth;
pub mod cvs;
pub mod files;
pub mod uploads;
