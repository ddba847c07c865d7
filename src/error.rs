//! Unified error types for convopack.
//!
//! This module provides a single [`ConvopackError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! Errors come in two sizes:
//!
//! - **Unit errors** belong to one archive or one conversation. The batch
//!   operations catch them, log them and turn them into counters
//!   ([`IngestReport`](crate::ingest::IngestReport),
//!   [`ExportStats`](crate::core::output::ExportStats)).
//! - **Run errors** mean the batch cannot meaningfully continue: the exports
//!   directory is missing, or the master corpus file is not a JSON array.
//!   These are returned to the caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for convopack operations.
///
/// # Example
///
/// ```rust
/// use convopack::error::Result;
/// use convopack::Record;
///
/// fn my_function() -> Result<Vec<Record>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ConvopackError>;

/// The error type for all convopack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvopackError {
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is not a readable archive container.
    #[error("Invalid archive {}: {source}", path.display())]
    Archive {
        /// Archive that failed to open or read
        path: PathBuf,
        /// The underlying zip error
        #[source]
        source: zip::result::ZipError,
    },

    /// The embedded conversations file could not be decoded.
    #[error("Invalid conversations payload in {}: {message}", path.display())]
    InvalidPayload {
        /// Archive the payload came from
        path: PathBuf,
        /// Description of what's wrong
        message: String,
    },

    /// The master corpus file is not a well-formed corpus.
    ///
    /// This is the only data error that aborts a rendering run.
    #[error("Invalid corpus {}: {message}", path.display())]
    InvalidCorpus {
        /// Path of the corpus file
        path: PathBuf,
        /// Description of what's wrong
        message: String,
    },

    /// No free file name could be claimed for an output document.
    #[error("No free file name for {} after {attempts} attempts", path.display())]
    CollisionExhausted {
        /// The originally requested path
        path: PathBuf,
        /// How many suffixed candidates were tried
        attempts: usize,
    },

    /// A required input path does not exist.
    #[error("Input not found: {}", path.display())]
    MissingInput {
        /// The missing path
        path: PathBuf,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ConvopackError {
    /// Creates an archive error for the given path.
    pub fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        ConvopackError::Archive {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid payload error.
    pub fn invalid_payload(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConvopackError::InvalidPayload {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid corpus error.
    pub fn invalid_corpus(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConvopackError::InvalidCorpus {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a collision exhaustion error.
    pub fn collision_exhausted(path: impl Into<PathBuf>, attempts: usize) -> Self {
        ConvopackError::CollisionExhausted {
            path: path.into(),
            attempts,
        }
    }

    /// Creates a missing input error.
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        ConvopackError::MissingInput { path: path.into() }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ConvopackError::Io(_))
    }

    /// Returns `true` if this is an archive container error.
    pub fn is_archive(&self) -> bool {
        matches!(self, ConvopackError::Archive { .. })
    }

    /// Returns `true` if the master corpus could not be loaded.
    pub fn is_invalid_corpus(&self) -> bool {
        matches!(self, ConvopackError::InvalidCorpus { .. })
    }

    /// Returns `true` if this is a file name collision error.
    pub fn is_collision(&self) -> bool {
        matches!(self, ConvopackError::CollisionExhausted { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ConvopackError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
        assert!(err.is_io());
    }

    #[test]
    fn test_json_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ConvopackError::from(json_err);
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_archive_error_display() {
        let err = ConvopackError::archive(
            "/exports/broken.zip",
            zip::result::ZipError::FileNotFound,
        );
        let display = err.to_string();
        assert!(display.contains("/exports/broken.zip"));
        assert!(err.is_archive());
        assert!(!err.is_io());
    }

    #[test]
    fn test_invalid_corpus_display() {
        let err = ConvopackError::invalid_corpus("master.json", "expected a JSON array");
        assert_eq!(
            err.to_string(),
            "Invalid corpus master.json: expected a JSON array"
        );
        assert!(err.is_invalid_corpus());
    }

    #[test]
    fn test_collision_display() {
        let err = ConvopackError::collision_exhausted("out/a.md", 10);
        assert!(err.to_string().contains("after 10 attempts"));
        assert!(err.is_collision());
    }

    #[test]
    fn test_invalid_payload_display() {
        let err = ConvopackError::invalid_payload("x.zip", "expected value at line 1");
        assert!(err.to_string().contains("x.zip"));
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn test_missing_input_display() {
        let err = ConvopackError::missing_input("/nope");
        assert_eq!(err.to_string(), "Input not found: /nope");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let err = ConvopackError::archive("a.zip", zip::result::ZipError::FileNotFound);
        assert!(err.source().is_some());
    }
}
