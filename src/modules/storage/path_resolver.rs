use std::path::{Path, PathBuf};

use crate::core::config::StorageConfig;

/// Maps logical storage references to filesystem paths and back.
///
/// Three path conventions coexist in stored records and client requests:
///
/// - public URLs: `/storage/uploads/...` under the public root
/// - private paths: `storage/uploads/...` under the private root
/// - legacy URLs: `/uploads/...` under the legacy root
///
/// Anything else is either an already-absolute filesystem path (returned
/// unchanged) or a bare relative path joined to the base directory. The
/// resolver never fails: callers stat the result and treat absence as
/// not-found. Delete paths must pass through here before touching disk so a
/// client-supplied string cannot name an arbitrary location by prefix games.
#[derive(Debug, Clone)]
pub struct PathResolver {
    base_dir: PathBuf,
    public_root: String,
    private_root: String,
    legacy_root: String,
    public_url_prefix: String,
    legacy_url_prefix: String,
}

impl PathResolver {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            public_root: config.public_root.clone(),
            private_root: config.private_root.clone(),
            legacy_root: config.legacy_root.clone(),
            public_url_prefix: config.public_url_prefix.clone(),
            legacy_url_prefix: config.legacy_url_prefix.clone(),
        }
    }

    /// Resolve a logical reference to a filesystem path.
    ///
    /// Recognition order: public URL prefix, legacy URL prefix, absolute
    /// path (idempotent), private root prefix, then bare-relative fallback.
    pub fn resolve(&self, logical: &str) -> PathBuf {
        let logical = logical.trim();

        if let Some(rest) = strip_segment_prefix(logical, &self.public_url_prefix) {
            return self.base_dir.join(&self.public_root).join(rest);
        }

        if let Some(rest) = strip_segment_prefix(logical, &self.legacy_url_prefix) {
            return self.base_dir.join(&self.legacy_root).join(rest);
        }

        let path = Path::new(logical);
        if path.is_absolute() {
            return path.to_path_buf();
        }

        if let Some(rest) = strip_segment_prefix(logical, &self.private_root) {
            return self.base_dir.join(&self.private_root).join(rest);
        }

        // Unrecognized shape: treat as relative to the base directory.
        self.base_dir.join(logical.trim_start_matches('/'))
    }

    /// Map a filesystem path back to its logical reference, if it lives
    /// under one of the configured roots.
    pub fn to_logical(&self, physical: &Path) -> Option<String> {
        let public = self.base_dir.join(&self.public_root);
        if let Ok(rest) = physical.strip_prefix(&public) {
            return Some(format!(
                "{}/{}",
                self.public_url_prefix,
                rest.to_string_lossy()
            ));
        }

        let legacy = self.base_dir.join(&self.legacy_root);
        if let Ok(rest) = physical.strip_prefix(&legacy) {
            return Some(format!(
                "{}/{}",
                self.legacy_url_prefix,
                rest.to_string_lossy()
            ));
        }

        let private = self.base_dir.join(&self.private_root);
        if let Ok(rest) = physical.strip_prefix(&private) {
            return Some(format!("{}/{}", self.private_root, rest.to_string_lossy()));
        }

        None
    }

    /// Logical URL for a file stored under the public root
    pub fn public_url(&self, relative: &str) -> String {
        format!("{}/{}", self.public_url_prefix, relative)
    }

    /// Logical path for a file stored under the private root
    pub fn private_path(&self, relative: &str) -> String {
        format!("{}/{}", self.private_root, relative)
    }

    pub fn public_root_dir(&self) -> PathBuf {
        self.base_dir.join(&self.public_root)
    }

    pub fn private_root_dir(&self) -> PathBuf {
        self.base_dir.join(&self.private_root)
    }

    /// Whether a logical directory is a valid housekeeping target: only the
    /// public URL space and the legacy uploads space may be reclaimed.
    pub fn is_reclaim_target(&self, directory: &str) -> bool {
        let directory = directory.trim();
        strip_segment_prefix(directory, &self.public_url_prefix).is_some()
            || strip_segment_prefix(directory, &self.legacy_url_prefix).is_some()
    }
}

/// Strip `prefix` from `value` when it matches on a whole path segment,
/// returning the remainder without its leading slash. `"/uploadsx"` does not
/// match prefix `"/uploads"`.
fn strip_segment_prefix<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = value.strip_prefix(prefix)?;
    rest.strip_prefix('/').or(if rest.is_empty() {
        Some("")
    } else {
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn resolver() -> PathResolver {
        PathResolver::new(&StorageConfig::with_base_dir(PathBuf::from("/srv/karira")))
    }

    #[test]
    fn resolves_public_url_prefix() {
        let r = resolver();
        assert_eq!(
            r.resolve("/storage/uploads/job-images/a.png"),
            PathBuf::from("/srv/karira/public/storage/uploads/job-images/a.png")
        );
    }

    #[test]
    fn resolves_legacy_url_prefix() {
        let r = resolver();
        assert_eq!(
            r.resolve("/uploads/cvs/old.pdf"),
            PathBuf::from("/srv/karira/public/uploads/cvs/old.pdf")
        );
    }

    #[test]
    fn resolves_private_root_prefix() {
        let r = resolver();
        assert_eq!(
            r.resolve("storage/uploads/cvs/b.pdf"),
            PathBuf::from("/srv/karira/storage/uploads/cvs/b.pdf")
        );
    }

    #[test]
    fn absolute_paths_are_idempotent() {
        let r = resolver();
        assert_eq!(
            r.resolve("/var/data/elsewhere/c.pdf"),
            PathBuf::from("/var/data/elsewhere/c.pdf")
        );
        // Resolving a resolved path changes nothing
        let once = r.resolve("/storage/uploads/x.png");
        assert_eq!(r.resolve(once.to_str().unwrap()), once);
    }

    #[test]
    fn bare_relative_falls_back_to_base_dir() {
        let r = resolver();
        assert_eq!(
            r.resolve("misc/notes.txt"),
            PathBuf::from("/srv/karira/misc/notes.txt")
        );
    }

    #[test]
    fn prefix_must_match_whole_segment() {
        let r = resolver();
        // "/uploadsx" is not the legacy space
        assert_eq!(
            r.resolve("/uploadsx/a.pdf"),
            PathBuf::from("/uploadsx/a.pdf")
        );
    }

    #[test]
    fn logical_roundtrip() {
        let r = resolver();
        let physical = r.resolve("/storage/uploads/logos/acme.png");
        assert_eq!(
            r.to_logical(&physical).as_deref(),
            Some("/storage/uploads/logos/acme.png")
        );

        let physical = r.resolve("storage/uploads/cvs/x.pdf");
        assert_eq!(
            r.to_logical(&physical).as_deref(),
            Some("storage/uploads/cvs/x.pdf")
        );

        assert_eq!(r.to_logical(Path::new("/var/tmp/evil.pdf")), None);
    }

    #[test]
    fn reclaim_targets() {
        let r = resolver();
        assert!(r.is_reclaim_target("/storage/uploads/job-images"));
        assert!(r.is_reclaim_target("/uploads/cvs"));
        assert!(r.is_reclaim_target("/uploads"));
        assert!(!r.is_reclaim_target("storage/uploads/cvs"));
        assert!(!r.is_reclaim_target("/etc"));
        assert!(!r.is_reclaim_target("/uploadsx"));
    }
}
