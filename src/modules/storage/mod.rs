//! Storage module for file management
//!
//! Local-disk storage for uploaded files, plus the path resolver that
//! reconciles the three historical storage conventions (public root,
//! private root, legacy uploads root).

mod local_storage;
mod naming;
mod path_resolver;

pub use local_storage::{LocalStorage, StoredEntry};
pub use naming::{generate_file_name, sanitize_file_name};
pub use path_resolver::PathResolver;
