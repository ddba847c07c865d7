//! Single-document Markdown renderer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use super::{EMPTY_MARKER, RULE, role_label, stamp};
use crate::config::RenderConfig;
use crate::core::corpus::Corpus;
use crate::core::flatten::{FlattenMode, flatten_with};
use crate::error::Result;
use crate::progress::{Progress, should_report};
use crate::record::Record;

/// Writes every conversation of the corpus into one Markdown file.
///
/// # Format
/// ```text
/// # ChatGPT Conversations - Readable Format
///
/// **Generated on:** 2024-06-15 12:30:00
/// **Total conversations:** 2
///
/// ---
///
/// ## 1. Title
/// **Created:** 2024-01-15 10:30:00
///
/// **User:** Hello
///
/// **Assistant:** Hi there
///
/// ---
/// ```
pub fn write_combined_markdown(
    corpus: &Corpus,
    output_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<()> {
    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(output_path)?);

    let mut section = header(corpus, config);
    writer.write_all(section.as_bytes())?;

    for (idx, record) in corpus.iter().enumerate() {
        let position = idx + 1;
        section.clear();
        push_section(&mut section, record, position, config.flatten_mode);
        writer.write_all(section.as_bytes())?;
        report(config, position, corpus.len());
    }

    writer.flush()?;
    info!(path = %output_path.display(), conversations = corpus.len(), "combined document written");
    Ok(())
}

/// Renders the combined document to a string.
///
/// Same format as [`write_combined_markdown`].
pub fn to_combined_markdown(corpus: &Corpus, config: &RenderConfig) -> String {
    let mut out = header(corpus, config);
    for (idx, record) in corpus.iter().enumerate() {
        push_section(&mut out, record, idx + 1, config.flatten_mode);
        report(config, idx + 1, corpus.len());
    }
    out
}

fn header(corpus: &Corpus, config: &RenderConfig) -> String {
    format!(
        "# {}\n\n**Generated on:** {}\n**Total conversations:** {}\n\n{RULE}\n\n",
        config.heading,
        stamp(config.timestamp()),
        corpus.len()
    )
}

fn push_section(out: &mut String, record: &Record, position: usize, mode: FlattenMode) {
    out.push_str(&format!("## {}. {}\n", position, record.title_or(position)));
    out.push_str(&format!("**Created:** {}\n\n", record.create_time().display()));

    let turns = flatten_with(record, mode);
    if turns.is_empty() {
        out.push_str(&format!("{EMPTY_MARKER}\n\n"));
    }
    for turn in &turns {
        out.push_str(&format!("**{}:** {}\n\n", role_label(&turn.role), turn.text));
    }

    out.push_str(&format!("{RULE}\n\n"));
}

fn report(config: &RenderConfig, processed: usize, total: usize) {
    if let Some(callback) = &config.progress {
        if should_report(processed, config.progress_every) {
            callback(Progress::new(processed, total));
        }
    }
}
