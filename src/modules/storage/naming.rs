use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Anything that is not ASCII alphanumeric gets replaced to keep on-disk
    /// names filesystem-safe across platforms.
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9]").unwrap();
}

/// Sanitize a user-supplied filename for on-disk use.
///
/// The extension (if any) is sanitized separately so `résumé.pdf` keeps its
/// `.pdf` suffix. The original name is stored untouched in the metadata row
/// for display and Content-Disposition.
pub fn sanitize_file_name(original: &str) -> String {
    match original.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!(
                "{}.{}",
                UNSAFE_CHARS.replace_all(stem, "_"),
                UNSAFE_CHARS.replace_all(ext, "_")
            )
        }
        _ => UNSAFE_CHARS.replace_all(original, "_").into_owned(),
    }
}

/// Generate a collision-resistant on-disk name: millisecond timestamp plus
/// the sanitized original name.
pub fn generate_file_name(original: &str) -> String {
    format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_file_name(original)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_non_alphanumerics() {
        assert_eq!(sanitize_file_name("my cv (final).pdf"), "my_cv__final_.pdf");
        assert_eq!(sanitize_file_name("résumé.pdf"), "r_sum_.pdf");
        assert_eq!(sanitize_file_name("plain.pdf"), "plain.pdf");
    }

    #[test]
    fn sanitize_handles_missing_extension() {
        assert_eq!(sanitize_file_name("README"), "README");
        assert_eq!(sanitize_file_name("no ext name"), "no_ext_name");
        // Dotfile-style names have no stem, so the whole name is sanitized
        assert_eq!(sanitize_file_name(".env"), "_env");
    }

    #[test]
    fn generated_names_are_prefixed_with_timestamp() {
        let name = generate_file_name("résumé.pdf");
        let (prefix, rest) = name.split_once('-').unwrap();
        assert!(prefix.parse::<i64>().unwrap() > 0);
        assert_eq!(rest, "r_sum_.pdf");
    }
}
