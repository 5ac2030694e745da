use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::CleanupResponseDto;
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::{LocalStorage, StoredEntry};

/// Disk-space reclamation over a storage directory.
///
/// Deletes files strictly older than the requested age together with their
/// metadata rows, so a reclaim pass cannot leave dangling records. Intended
/// as an infrequent, admin-triggered batch, not a background loop.
pub struct HousekeepingService {
    repository: FileRepository,
    storage: Arc<LocalStorage>,
}

impl HousekeepingService {
    pub fn new(repository: FileRepository, storage: Arc<LocalStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    pub async fn reclaim(&self, directory: &str, older_than_days: f64) -> Result<CleanupResponseDto> {
        // `> 0.0` also rejects NaN
        if !(older_than_days > 0.0) {
            return Err(AppError::Validation(
                "olderThanDays must be a positive number".to_string(),
            ));
        }

        if !self.storage.resolver().is_reclaim_target(directory) {
            return Err(AppError::Validation(format!(
                "Invalid directory '{}': must be under the public or legacy uploads prefix",
                directory
            )));
        }

        let entries = self.storage.list_dir(directory).await?;

        let cutoff = Utc::now() - Duration::milliseconds((older_than_days * 86_400_000.0) as i64);
        let scanned_files = entries.len() as u64;
        let total_size_before: u64 = entries.iter().map(|e| e.size).sum();

        let mut deleted_files = 0u64;
        let mut space_freed = 0u64;
        let mut reclaimed_references: Vec<String> = Vec::new();

        for entry in Self::select_expired(&entries, cutoff) {
            let physical = entry.path.to_string_lossy().into_owned();
            match self.storage.remove(&physical).await {
                Ok(true) => {
                    deleted_files += 1;
                    space_freed += entry.size;
                    // Collect both spellings a record may have stored
                    if let Some(logical) = self.storage.resolver().to_logical(&entry.path) {
                        reclaimed_references.push(logical);
                    }
                    reclaimed_references.push(physical);
                }
                Ok(false) => {
                    // Raced with another delete; nothing to reclaim
                    warn!("File {} vanished during cleanup scan", physical);
                }
                Err(e) => {
                    // Individual failures are skipped, not fatal to the batch
                    warn!("Failed to delete {} during cleanup: {}", physical, e);
                }
            }
        }

        let deleted_records = self.repository.delete_by_paths(&reclaimed_references).await?;

        info!(
            "Cleanup of {}: scanned={}, deleted={}, records_deleted={}, bytes_freed={}",
            directory, scanned_files, deleted_files, deleted_records, space_freed
        );

        Ok(CleanupResponseDto {
            directory: directory.to_string(),
            scanned_files,
            deleted_files,
            remaining_files: scanned_files - deleted_files,
            deleted_records,
            space_freed,
            total_size_before,
            total_size_after: total_size_before - space_freed,
        })
    }

    /// Files whose modification time is strictly older than the cutoff
    fn select_expired(entries: &[StoredEntry], cutoff: DateTime<Utc>) -> Vec<&StoredEntry> {
        entries.iter().filter(|e| e.modified < cutoff).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, size: u64, age_days: i64) -> StoredEntry {
        StoredEntry {
            path: PathBuf::from(format!("/srv/app/public/uploads/cvs/{}", name)),
            file_name: name.to_string(),
            size,
            modified: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn selects_only_strictly_older_files() {
        let entries = vec![
            entry("old.pdf", 4096, 40),
            entry("recent.pdf", 1024, 5),
            entry("ancient.pdf", 2048, 400),
        ];
        let cutoff = Utc::now() - Duration::days(30);

        let expired = HousekeepingService::select_expired(&entries, cutoff);
        let names: Vec<&str> = expired.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["old.pdf", "ancient.pdf"]);

        let freed: u64 = expired.iter().map(|e| e.size).sum();
        assert_eq!(freed, 6144);
    }

    #[test]
    fn nothing_expires_with_future_cutoff_equivalent() {
        // A very large threshold puts the cutoff before every file
        let entries = vec![entry("a.pdf", 10, 40), entry("b.pdf", 20, 5)];
        let cutoff = Utc::now() - Duration::days(1000);
        assert!(HousekeepingService::select_expired(&entries, cutoff).is_empty());
    }
}
