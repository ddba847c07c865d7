//! Safe output file names.
//!
//! Titles become file name components through [`sanitize_title`], and
//! [`claim_unique_file`] creates the file under the first free
//! `name.ext`, `name_1.ext`, `name_2.ext`, ... path.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ConvopackError, Result};

/// Maximum length of a sanitized title, in characters.
pub const MAX_TITLE_LEN: usize = 50;

/// Substitute for titles that sanitize to nothing.
pub const UNTITLED: &str = "Untitled";

/// How many suffixed candidates [`claim_unique_file`] tries before giving up.
pub const MAX_CLAIM_ATTEMPTS: usize = 10_000;

/// Maps an arbitrary title to a file name component.
///
/// Keeps ASCII letters, digits, space, `_` and `-`, truncates to
/// [`MAX_TITLE_LEN`] characters and trims surrounding whitespace.
///
/// ```
/// use convopack::core::naming::sanitize_title;
///
/// assert_eq!(sanitize_title("A/B: Test?? 2024"), "AB Test 2024");
/// assert_eq!(sanitize_title("???"), "Untitled");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .take(MAX_TITLE_LEN)
        .collect();

    let trimmed = kept.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns the `n`-th collision candidate for `path` (`n == 0` is `path` itself).
pub fn suffixed_path(path: &Path, n: usize) -> PathBuf {
    if n == 0 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{n}"),
    };
    path.with_file_name(name)
}

/// Creates the first free collision candidate of `path` and returns it opened for writing.
///
/// Uses exclusive create, so two writers can never claim the same path.
pub fn claim_unique_file(path: &Path) -> Result<(PathBuf, File)> {
    claim_unique_file_within(path, MAX_CLAIM_ATTEMPTS)
}

/// [`claim_unique_file`] with an explicit number of candidates to try.
pub fn claim_unique_file_within(path: &Path, attempts: usize) -> Result<(PathBuf, File)> {
    for n in 0..attempts {
        let candidate = suffixed_path(path, n);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }
    }
    Err(ConvopackError::collision_exhausted(path, attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_strips_punctuation() {
        let s = sanitize_title("A/B: Test?? 2024");
        assert_eq!(s, "AB Test 2024");
        assert!(
            s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        );
    }

    #[test]
    fn test_sanitize_truncates_then_trims() {
        let title = format!("{} tail", "x".repeat(49));
        // 49 x's + space is 50 chars, trailing space then trimmed
        assert_eq!(sanitize_title(&title), "x".repeat(49));
    }

    #[test]
    fn test_sanitize_non_ascii() {
        assert_eq!(sanitize_title("Привет мир"), UNTITLED);
        assert_eq!(sanitize_title("Café au lait"), "Caf au lait");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_title(""), UNTITLED);
        assert_eq!(sanitize_title("   "), UNTITLED);
    }

    #[test]
    fn test_suffixed_path() {
        let p = Path::new("/out/2024-01-15_Hello.md");
        assert_eq!(suffixed_path(p, 0), p);
        assert_eq!(
            suffixed_path(p, 2),
            PathBuf::from("/out/2024-01-15_Hello_2.md")
        );
        assert_eq!(
            suffixed_path(Path::new("notes"), 1),
            PathBuf::from("notes_1")
        );
    }

    #[test]
    fn test_claim_unique_file_suffixes() {
        let dir = tempdir().unwrap();
        let wanted = dir.path().join("a.md");

        let (first, _) = claim_unique_file(&wanted).unwrap();
        let (second, _) = claim_unique_file(&wanted).unwrap();
        let (third, _) = claim_unique_file(&wanted).unwrap();

        assert_eq!(first, wanted);
        assert_eq!(second, dir.path().join("a_1.md"));
        assert_eq!(third, dir.path().join("a_2.md"));
    }

    #[test]
    fn test_claim_fills_first_gap() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "").unwrap();
        std::fs::write(dir.path().join("a_2.md"), "").unwrap();

        let (claimed, _) = claim_unique_file(&dir.path().join("a.md")).unwrap();
        assert_eq!(claimed, dir.path().join("a_1.md"));
    }

    #[test]
    fn test_claim_gives_up_after_attempts() {
        let dir = tempdir().unwrap();
        let wanted = dir.path().join("a.md");
        std::fs::write(&wanted, "").unwrap();
        std::fs::write(dir.path().join("a_1.md"), "").unwrap();

        let err = claim_unique_file_within(&wanted, 2).unwrap_err();
        assert!(err.is_collision());
        let (claimed, _) = claim_unique_file_within(&wanted, 3).unwrap();
        assert_eq!(claimed, dir.path().join("a_2.md"));
    }

    #[test]
    fn test_claim_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let err = claim_unique_file(&dir.path().join("nope").join("a.md")).unwrap_err();
        assert!(err.is_io());
    }
}
