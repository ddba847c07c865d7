//! One-file-per-conversation Markdown renderer.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use super::{EMPTY_MARKER, RULE, role_label, stamp};
use crate::config::RenderConfig;
use crate::core::corpus::Corpus;
use crate::core::flatten::{FlattenMode, flatten_with};
use crate::core::naming::{claim_unique_file_within, sanitize_title};
use crate::error::Result;
use crate::progress::{Progress, should_report};
use crate::record::Record;

/// Outcome of a [`write_separate`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Conversations written.
    pub exported: usize,
    /// Conversations that could not be written.
    pub failed: usize,
    /// Written files, in corpus order.
    pub files: Vec<PathBuf>,
}

/// File name for a conversation: `<YYYY-MM-DD|unknown-date>_<sanitized title>.md`.
///
/// ```
/// use convopack::core::output::record_file_name;
/// use convopack::Record;
/// use serde_json::json;
///
/// let record = Record::from_value(json!({"title": "Rust: traits?"})).unwrap();
/// assert_eq!(record_file_name(&record, 1), "unknown-date_Rust traits.md");
/// ```
pub fn record_file_name(record: &Record, position: usize) -> String {
    format!(
        "{}_{}.md",
        record.create_time().file_date(),
        sanitize_title(&record.title_or(position))
    )
}

/// Renders one conversation as a standalone document.
///
/// # Format
/// ```text
/// # Title
///
/// **Created:** 2024-01-15 10:30:00
/// **Exported:** 2024-06-15 12:30:00
///
/// ---
///
/// ## User
///
/// Hello
///
/// ---
/// ```
pub fn to_record_markdown(
    record: &Record,
    position: usize,
    exported_at: DateTime<Local>,
    mode: FlattenMode,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", record.title_or(position)));
    out.push_str(&format!("**Created:** {}\n", record.create_time().display()));
    out.push_str(&format!("**Exported:** {}\n\n", stamp(exported_at)));
    out.push_str(&format!("{RULE}\n\n"));

    let turns = flatten_with(record, mode);
    if turns.is_empty() {
        out.push_str(&format!("{EMPTY_MARKER}\n\n"));
    }
    for turn in &turns {
        out.push_str(&format!("## {}\n\n", role_label(&turn.role)));
        out.push_str(&format!("{}\n\n", turn.text));
        out.push_str(&format!("{RULE}\n\n"));
    }
    out
}

/// Writes every conversation to its own file in `output_dir`.
///
/// Name collisions get `_1`, `_2`, ... suffixes. A conversation that fails
/// to write is logged and counted; the rest are still written. Only failing
/// to create `output_dir` itself is an error.
pub fn write_separate(
    corpus: &Corpus,
    output_dir: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<ExportStats> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let exported_at = config.timestamp();
    let mut stats = ExportStats::default();

    for (idx, record) in corpus.iter().enumerate() {
        let position = idx + 1;
        match export_record(record, position, output_dir, exported_at, config) {
            Ok(path) => {
                info!(file = %path.display(), "conversation exported");
                stats.exported += 1;
                stats.files.push(path);
            }
            Err(e) => {
                warn!(position, error = %e, "failed to export conversation");
                stats.failed += 1;
            }
        }

        if let Some(callback) = &config.progress {
            if should_report(position, config.progress_every) {
                callback(Progress::new(position, corpus.len()));
            }
        }
    }

    Ok(stats)
}

fn export_record(
    record: &Record,
    position: usize,
    output_dir: &Path,
    exported_at: DateTime<Local>,
    config: &RenderConfig,
) -> Result<PathBuf> {
    let wanted = output_dir.join(record_file_name(record, position));
    let (path, mut file) = claim_unique_file_within(&wanted, config.claim_attempts)?;

    let content = to_record_markdown(record, position, exported_at, config.flatten_mode);
    if let Err(e) = file.write_all(content.as_bytes()).and_then(|()| file.flush()) {
        drop(file);
        // leave no half-written claim behind
        let _ = fs::remove_file(&path);
        return Err(e.into());
    }
    Ok(path)
}
