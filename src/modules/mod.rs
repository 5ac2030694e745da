//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for things that live outside the database, currently
//! the local-disk file storage.

pub mod storage;
