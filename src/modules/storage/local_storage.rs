use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::{debug, warn};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::PathResolver;

/// A file found while scanning a storage directory
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// Local-disk storage client.
///
/// All operations take logical references and push them through the
/// `PathResolver`; nothing outside this module touches raw paths.
pub struct LocalStorage {
    resolver: PathResolver,
}

impl LocalStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            resolver: PathResolver::new(config),
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Create the public and private roots if absent. Idempotent; called
    /// once at startup. The legacy root is never created by new code.
    pub async fn ensure_roots(&self) -> Result<()> {
        for root in [
            self.resolver.public_root_dir(),
            self.resolver.private_root_dir(),
        ] {
            fs::create_dir_all(&root).await?;
            debug!("Storage root ready: {}", root.display());
        }
        Ok(())
    }

    /// Write bytes under a logical reference, creating parent directories
    /// as needed. Returns the resolved filesystem path.
    pub async fn write(&self, logical: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.resolver.resolve(logical);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;

        debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(path)
    }

    /// Read a file fully into memory. `Ok(None)` means the resolved path
    /// does not exist; that is the caller's not-found case, not an error.
    pub async fn read(&self, logical: &str) -> Result<Option<Vec<u8>>> {
        let path = self.resolver.resolve(logical);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Whether a file exists at the resolved path
    pub async fn exists(&self, logical: &str) -> Result<bool> {
        let path = self.resolver.resolve(logical);
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Delete a file. Returns `false` when it was already gone.
    pub async fn remove(&self, logical: &str) -> Result<bool> {
        let path = self.resolver.resolve(logical);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// List regular files directly under a logical directory.
    ///
    /// Entries whose metadata cannot be read are skipped with a warning
    /// rather than failing the whole listing. A missing directory is
    /// NotFound.
    pub async fn list_dir(&self, logical_dir: &str) -> Result<Vec<StoredEntry>> {
        let dir = self.resolver.resolve(logical_dir);
        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "Directory '{}' not found",
                    logical_dir
                )));
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    warn!("Skipping unreadable entry {}: {}", path.display(), e);
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }
            let modified = match meta.modified() {
                Ok(mtime) => DateTime::<Utc>::from(mtime),
                Err(e) => {
                    warn!("Skipping entry without mtime {}: {}", path.display(), e);
                    continue;
                }
            };
            entries.push(StoredEntry {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                path,
                size: meta.len(),
                modified,
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn storage(base: &std::path::Path) -> LocalStorage {
        LocalStorage::new(&StorageConfig::with_base_dir(base.to_path_buf()))
    }

    #[tokio::test]
    async fn write_read_remove_roundtrip() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path());

        let logical = "/storage/uploads/job-images/test.png";
        let path = storage.write(logical, b"png-bytes").await.unwrap();
        assert!(path.starts_with(dir.path()));

        let bytes = storage.read(logical).await.unwrap().unwrap();
        assert_eq!(bytes, b"png-bytes");
        assert!(storage.exists(logical).await.unwrap());

        assert!(storage.remove(logical).await.unwrap());
        // Second delete reports the file was already gone
        assert!(!storage.remove(logical).await.unwrap());
        assert_eq!(storage.read(logical).await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_of_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path());
        assert_eq!(
            storage.read("storage/uploads/cvs/none.pdf").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn list_dir_reports_files_only() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path());

        storage.write("/uploads/cvs/a.pdf", b"aaaa").await.unwrap();
        storage.write("/uploads/cvs/b.pdf", b"bb").await.unwrap();
        // Nested directory must not appear in the listing
        storage
            .write("/uploads/cvs/nested/c.pdf", b"c")
            .await
            .unwrap();

        let mut entries = storage.list_dir("/uploads/cvs").await.unwrap();
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file_name, "a.pdf");
        assert_eq!(entries[0].size, 4);
        assert_eq!(entries[1].size, 2);
    }

    #[tokio::test]
    async fn list_dir_of_missing_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path());
        let err = storage.list_dir("/uploads/nothing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
