mod file_repository;

pub use file_repository::{FileChanges, FileQuery, FileRepository, NewFileRecord};
