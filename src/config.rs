//! Configuration types for ingestion and rendering.
//!
//! This module provides builder-style configuration structs for library
//! usage, without any CLI framework dependencies.
//!
//! - [`IngestConfig`] - which archives to read and where to keep extracted payloads
//! - [`RenderConfig`] - how conversations are flattened and stamped
//!
//! # Example
//!
//! ```rust
//! use convopack::config::{IngestConfig, RenderConfig};
//! use convopack::core::flatten::FlattenMode;
//!
//! let ingest = IngestConfig::new().with_extract_dir("extracted");
//! let render = RenderConfig::new().with_flatten_mode(FlattenMode::MainLine);
//!
//! assert_eq!(ingest.member_name, "conversations.json");
//! assert_eq!(render.progress_every, 10);
//! ```

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::flatten::FlattenMode;
use crate::core::naming::MAX_CLAIM_ATTEMPTS;
use crate::progress::ProgressCallback;

/// Name of the conversations file inside a ChatGPT export archive.
pub const DEFAULT_MEMBER_NAME: &str = "conversations.json";

/// Heading of the combined document.
pub const DEFAULT_HEADING: &str = "ChatGPT Conversations - Readable Format";

/// Configuration for reading export archives.
///
/// # Example
///
/// ```rust
/// use convopack::config::IngestConfig;
///
/// let config = IngestConfig::new()
///     .with_member_name("chats.json")
///     .with_archive_extension("ZIP");
///
/// assert_eq!(config.archive_extension, "ZIP");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Archive member holding the conversations (default: `conversations.json`)
    pub member_name: String,

    /// Archive file extension, matched case-insensitively (default: `zip`)
    pub archive_extension: String,

    /// Where to keep a copy of each extracted payload as
    /// `<archive-stem>_conversations.json` (default: none, extract in memory)
    pub extract_dir: Option<PathBuf>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            member_name: DEFAULT_MEMBER_NAME.to_string(),
            archive_extension: "zip".to_string(),
            extract_dir: None,
        }
    }
}

impl IngestConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive member to extract.
    #[must_use]
    pub fn with_member_name(mut self, name: impl Into<String>) -> Self {
        self.member_name = name.into();
        self
    }

    /// Sets the archive file extension (without dot).
    #[must_use]
    pub fn with_archive_extension(mut self, ext: impl Into<String>) -> Self {
        self.archive_extension = ext.into();
        self
    }

    /// Keeps extracted payloads in `dir`.
    #[must_use]
    pub fn with_extract_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extract_dir = Some(dir.into());
        self
    }
}

/// Configuration for the Markdown renderers.
///
/// `generated_at` pins the "Generated on" / "Exported" stamp; when unset the
/// current local time is used.
#[derive(Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// How graph-form conversations are linearized (default: insertion order)
    pub flatten_mode: FlattenMode,

    /// Heading of the combined document
    pub heading: String,

    /// Fixed generation time (default: now)
    pub generated_at: Option<DateTime<Local>>,

    /// Report progress every N conversations, 0 disables (default: 10)
    pub progress_every: usize,

    /// Suffixed file names tried per conversation before it counts as failed
    #[serde(default = "default_claim_attempts")]
    pub claim_attempts: usize,

    #[serde(skip)]
    pub progress: Option<ProgressCallback>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            flatten_mode: FlattenMode::default(),
            heading: DEFAULT_HEADING.to_string(),
            generated_at: None,
            progress_every: 10,
            claim_attempts: MAX_CLAIM_ATTEMPTS,
            progress: None,
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("flatten_mode", &self.flatten_mode)
            .field("heading", &self.heading)
            .field("generated_at", &self.generated_at)
            .field("progress_every", &self.progress_every)
            .field("claim_attempts", &self.claim_attempts)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl RenderConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flatten mode.
    #[must_use]
    pub fn with_flatten_mode(mut self, mode: FlattenMode) -> Self {
        self.flatten_mode = mode;
        self
    }

    /// Sets the combined document heading.
    #[must_use]
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    /// Pins the generation time.
    #[must_use]
    pub fn with_generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Sets the progress reporting interval.
    #[must_use]
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    /// Sets how many file names are tried per conversation.
    #[must_use]
    pub fn with_claim_attempts(mut self, attempts: usize) -> Self {
        self.claim_attempts = attempts;
        self
    }

    /// Sets the progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// The generation stamp: pinned time or now.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.generated_at.unwrap_or_else(Local::now)
    }
}

fn default_claim_attempts() -> usize {
    MAX_CLAIM_ATTEMPTS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ingest_config_default() {
        let config = IngestConfig::default();
        assert_eq!(config.member_name, DEFAULT_MEMBER_NAME);
        assert_eq!(config.archive_extension, "zip");
        assert!(config.extract_dir.is_none());
    }

    #[test]
    fn test_ingest_config_builder() {
        let config = IngestConfig::new()
            .with_member_name("other.json")
            .with_extract_dir("/tmp/x");
        assert_eq!(config.member_name, "other.json");
        assert_eq!(config.extract_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert_eq!(config.flatten_mode, FlattenMode::InsertionOrder);
        assert_eq!(config.heading, DEFAULT_HEADING);
        assert_eq!(config.claim_attempts, MAX_CLAIM_ATTEMPTS);
        assert!(config.progress.is_none());
    }

    #[test]
    fn test_render_config_pinned_time() {
        let at = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let config = RenderConfig::new().with_generated_at(at);
        assert_eq!(config.timestamp(), at);
    }

    #[test]
    fn test_render_config_serde_skips_callback() {
        let config = RenderConfig::new()
            .with_flatten_mode(FlattenMode::MainLine)
            .with_progress(crate::progress::no_progress());
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"main-line\""));

        let parsed: RenderConfig = serde_json::from_str(&json).unwrap();
        assert!(parsed.progress.is_none());
        assert_eq!(parsed.flatten_mode, FlattenMode::MainLine);
    }

    #[test]
    fn test_render_config_debug_hides_callback() {
        let config = RenderConfig::new().with_progress(crate::progress::no_progress());
        assert!(format!("{config:?}").contains("progress: true"));
    }
}
