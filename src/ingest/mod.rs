//! Archive ingestion: turning a directory of ChatGPT export archives into conversations.
//!
//! Every file in the exports directory whose extension matches
//! [`IngestConfig::archive_extension`] is opened as a zip archive, and its
//! conversations member is decoded with [`parse_payload`]. Archives are
//! processed one at a time, in file-name order.
//!
//! A broken archive never stops the batch. Each archive ends up in one of
//! three states, see [`ArchiveOutcome`]:
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | Member decoded, at least one conversation | `Processed` |
//! | Member missing, or payload holds no conversations | `Skipped` |
//! | Not a zip archive, unreadable, invalid JSON | `Failed` |
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> convopack::Result<()> {
//! use convopack::config::IngestConfig;
//! use convopack::ingest::ArchiveIngestor;
//!
//! let ingestor = ArchiveIngestor::with_config(IngestConfig::new().with_extract_dir("extracted"));
//! let report = ingestor.ingest_dir("exports")?;
//!
//! println!(
//!     "{} processed, {} skipped, {} errored, {} conversations",
//!     report.processed(),
//!     report.skipped(),
//!     report.errored(),
//!     report.records.len()
//! );
//! # Ok(())
//! # }
//! ```

mod payload;

pub use payload::parse_payload;

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::config::IngestConfig;
use crate::error::{ConvopackError, Result};
use crate::record::Record;

/// Suffix of a staged payload: `<archive-stem>_conversations.json`.
const STAGED_SUFFIX: &str = "_conversations.json";

/// What happened to one archive.
#[derive(Debug)]
pub enum ArchiveOutcome {
    /// Conversations were extracted.
    Processed {
        /// Number of conversations taken from the archive
        records: usize,
    },
    /// Nothing to take from this archive.
    Skipped {
        /// Why the archive was skipped
        reason: String,
    },
    /// The archive could not be read.
    Failed {
        /// The per-archive error
        error: ConvopackError,
    },
}

impl ArchiveOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of one archive, by file name.
#[derive(Debug)]
pub struct ArchiveReport {
    /// File name of the archive
    pub name: String,
    /// What happened to it
    pub outcome: ArchiveOutcome,
}

/// Result of ingesting an exports directory.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Every conversation extracted, in archive order then payload order.
    /// Not yet deduplicated.
    pub records: Vec<Record>,

    /// Per-archive outcomes, in processing order.
    pub archives: Vec<ArchiveReport>,
}

impl IngestReport {
    /// Archives that yielded conversations.
    pub fn processed(&self) -> usize {
        self.archives.iter().filter(|a| a.outcome.is_processed()).count()
    }

    /// Archives with nothing to extract.
    pub fn skipped(&self) -> usize {
        self.archives.iter().filter(|a| a.outcome.is_skipped()).count()
    }

    /// Archives that could not be read.
    pub fn errored(&self) -> usize {
        self.archives.iter().filter(|a| a.outcome.is_failed()).count()
    }
}

/// Reads ChatGPT export archives.
#[derive(Debug, Clone, Default)]
pub struct ArchiveIngestor {
    config: IngestConfig,
}

impl ArchiveIngestor {
    /// Creates an ingestor with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingests every archive in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvopackError::MissingInput`] if `dir` does not exist, and
    /// an I/O error if it cannot be listed or the extraction directory cannot
    /// be created. Problems with individual archives are recorded in the
    /// report instead.
    pub fn ingest_dir(&self, dir: impl AsRef<Path>) -> Result<IngestReport> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Err(ConvopackError::missing_input(dir));
        }
        if let Some(extract_dir) = &self.config.extract_dir {
            fs::create_dir_all(extract_dir)?;
        }

        let mut report = IngestReport::default();
        for path in self.archive_paths(dir)? {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let (outcome, records) = self.ingest_archive(&path);
            report.records.extend(records);
            report.archives.push(ArchiveReport { name, outcome });
        }

        info!(
            processed = report.processed(),
            skipped = report.skipped(),
            errored = report.errored(),
            conversations = report.records.len(),
            "ingest finished"
        );
        Ok(report)
    }

    /// Ingests a single archive. Never fails: errors become
    /// [`ArchiveOutcome::Failed`].
    pub fn ingest_archive(&self, path: impl AsRef<Path>) -> (ArchiveOutcome, Vec<Record>) {
        let path = path.as_ref();
        match self.read_member(path) {
            Ok(None) => {
                let reason = format!("no {} in archive", self.config.member_name);
                warn!(archive = %path.display(), "{reason}");
                (ArchiveOutcome::Skipped { reason }, Vec::new())
            }
            Ok(Some(bytes)) => match self.decode(path, &bytes) {
                Ok(records) if records.is_empty() => {
                    warn!(archive = %path.display(), "no conversations found");
                    let reason = "no conversations found".to_string();
                    (ArchiveOutcome::Skipped { reason }, records)
                }
                Ok(records) => {
                    info!(archive = %path.display(), conversations = records.len(), "archive processed");
                    let outcome = ArchiveOutcome::Processed {
                        records: records.len(),
                    };
                    (outcome, records)
                }
                Err(error) => {
                    warn!(archive = %path.display(), %error, "archive failed");
                    (ArchiveOutcome::Failed { error }, Vec::new())
                }
            },
            Err(error) => {
                warn!(archive = %path.display(), %error, "archive failed");
                (ArchiveOutcome::Failed { error }, Vec::new())
            }
        }
    }

    /// Matching archive files in `dir`, sorted by file name.
    fn archive_paths(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && self.has_archive_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    fn has_archive_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.config.archive_extension))
    }

    /// Raw bytes of the conversations member, `None` if the archive lacks it.
    fn read_member(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        let file = File::open(path)?;
        let mut archive =
            ZipArchive::new(file).map_err(|e| ConvopackError::archive(path, e))?;

        let mut member = match archive.by_name(&self.config.member_name) {
            Ok(member) => member,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(ConvopackError::archive(path, e)),
        };

        let mut bytes = Vec::new();
        member.read_to_end(&mut bytes)?;
        debug!(archive = %path.display(), bytes = bytes.len(), "member extracted");
        Ok(Some(bytes))
    }

    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<Vec<Record>> {
        if let Some(extract_dir) = &self.config.extract_dir {
            stage(path, extract_dir, bytes)?;
        }
        parse_payload(bytes).map_err(|e| ConvopackError::invalid_payload(path, e.to_string()))
    }
}

/// Keeps a copy of an archive's payload as `<extract_dir>/<stem>_conversations.json`.
///
/// The bytes go to a fresh temporary file in `extract_dir` first, which is
/// then renamed into place. A truncated payload never appears under the
/// final name.
fn stage(archive: &Path, extract_dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let stem = archive
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let target = extract_dir.join(format!("{stem}{STAGED_SUFFIX}"));

    let mut staging = tempfile::Builder::new()
        .prefix(".staging-")
        .suffix(".json")
        .tempfile_in(extract_dir)?;
    staging.write_all(bytes)?;
    staging.flush()?;
    staging.persist(&target).map_err(|e| e.error)?;

    debug!(staged = %target.display(), "payload staged");
    Ok(target)
}
