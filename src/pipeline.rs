//! The merge stage: exports directory in, master corpus file out.

use std::path::Path;

use tracing::info;

use crate::config::IngestConfig;
use crate::core::corpus::Corpus;
use crate::core::processor::{DedupStats, deduplicate_with_stats};
use crate::error::Result;
use crate::ingest::{ArchiveIngestor, ArchiveReport};

/// Counters from [`merge_exports`].
#[derive(Debug, Default)]
pub struct MergeSummary {
    /// Archives that yielded conversations
    pub processed: usize,
    /// Archives with nothing to extract
    pub skipped: usize,
    /// Archives that could not be read
    pub errored: usize,
    /// Conversation counts before and after deduplication
    pub dedup: DedupStats,
    /// Per-archive outcomes
    pub archives: Vec<ArchiveReport>,
}

/// Ingests every archive in `exports_dir`, deduplicates, and saves the
/// corpus to `master_path`.
///
/// The corpus file is written even when no conversation was found.
///
/// ```rust,no_run
/// # fn main() -> convopack::Result<()> {
/// use convopack::config::IngestConfig;
/// use convopack::pipeline::merge_exports;
///
/// let summary = merge_exports("exports", "master_conversations.json", &IngestConfig::new())?;
/// println!("{} unique conversations", summary.dedup.unique_count);
/// # Ok(())
/// # }
/// ```
pub fn merge_exports(
    exports_dir: impl AsRef<Path>,
    master_path: impl AsRef<Path>,
    config: &IngestConfig,
) -> Result<MergeSummary> {
    let report = ArchiveIngestor::with_config(config.clone()).ingest_dir(exports_dir)?;
    let (processed, skipped, errored) = (report.processed(), report.skipped(), report.errored());

    let (unique, dedup) = deduplicate_with_stats(report.records);
    let corpus = Corpus::from_records(unique);
    corpus.save(master_path.as_ref())?;
    info!(
        path = %master_path.as_ref().display(),
        conversations = corpus.len(),
        duplicates = dedup.duplicates(),
        "master corpus saved"
    );

    Ok(MergeSummary {
        processed,
        skipped,
        errored,
        dedup,
        archives: report.archives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, payload: &str) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        writer
            .start_file("conversations.json", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(payload.as_bytes()).unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_merge_exports_dedups_across_archives() {
        let dir = tempdir().unwrap();
        let exports = dir.path().join("exports");
        fs::create_dir(&exports).unwrap();
        write_zip(&exports.join("a.zip"), r#"[{"id": "1", "title": "first"}, {"id": "2"}]"#);
        write_zip(&exports.join("b.zip"), r#"[{"id": "1", "title": "second"}, {"title": "no id"}]"#);
        fs::write(exports.join("c.zip"), "garbage").unwrap();

        let master = dir.path().join("out").join("master.json");
        let summary = merge_exports(&exports, &master, &IngestConfig::new()).unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.dedup.original_count, 4);
        assert_eq!(summary.dedup.unique_count, 3);

        let corpus = Corpus::load(&master).unwrap();
        assert_eq!(corpus.records()[0].title(), Some("first"));
    }

    #[test]
    fn test_merge_exports_empty_dir_writes_empty_corpus() {
        let dir = tempdir().unwrap();
        let master = dir.path().join("master.json");
        let summary = merge_exports(dir.path(), &master, &IngestConfig::new()).unwrap();

        assert_eq!(summary.dedup.unique_count, 0);
        assert_eq!(fs::read_to_string(&master).unwrap(), "[]\n");
    }
}
