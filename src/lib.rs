//! # Convopack
//!
//! A Rust library for turning ChatGPT data-export archives into one
//! deduplicated conversation corpus and readable Markdown.
//!
//! ## Overview
//!
//! A ChatGPT export is a zip archive holding a `conversations.json` file.
//! Convopack runs three stages over a directory of such archives:
//!
//! 1. **Merge** - extract every archive's conversations, drop repeats
//!    (first occurrence wins), save the master corpus as a JSON array
//! 2. **Render** - write the whole corpus as one Markdown document
//! 3. **Split** - write one Markdown file per conversation
//!
//! Broken archives and odd records are logged and counted, never fatal.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use convopack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Stage 1: exports/ -> master corpus
//!     let summary = merge_exports("exports", "master_conversations.json", &IngestConfig::new())?;
//!     println!("{} unique conversations", summary.dedup.unique_count);
//!
//!     // Stages 2 and 3
//!     let corpus = Corpus::load("master_conversations.json")?;
//!     let config = RenderConfig::new();
//!     write_combined_markdown(&corpus, "conversations_readable.md", &config)?;
//!     let stats = write_separate(&corpus, "conversations", &config)?;
//!     println!("{} files written", stats.exported);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Working with single conversations
//!
//! ```rust
//! use convopack::prelude::*;
//! use serde_json::json;
//!
//! let record = Record::from_value(json!({
//!     "title": "Hello",
//!     "create_time": 1700000000,
//!     "mapping": {
//!         "n1": null,
//!         "n2": {"message": {"author": {"role": "user"}, "content": {"parts": ["hi"]}}}
//!     }
//! }))
//! .unwrap();
//!
//! assert_eq!(flatten(&record), vec![Turn::new("user", "hi")]);
//! assert_eq!(record.create_time().file_date().len(), "YYYY-MM-DD".len());
//! ```
//!
//! ## Module Structure
//!
//! - [`record`] - [`Record`] and its message tree ([`MessageTree`](record::MessageTree))
//! - [`ingest`] - [`ArchiveIngestor`](ingest::ArchiveIngestor), [`parse_payload`](ingest::parse_payload)
//! - [`pipeline`] - [`merge_exports`](pipeline::merge_exports)
//! - [`core`] - Core processing
//!   - [`core::timestamp`] - [`Timestamp`](core::Timestamp) normalization
//!   - [`core::naming`] - [`sanitize_title`](core::sanitize_title), collision-free paths
//!   - [`core::flatten`] - [`flatten`](core::flatten()), [`FlattenMode`](core::FlattenMode)
//!   - [`core::processor`] - [`deduplicate`](core::deduplicate), [`DedupStats`](core::DedupStats)
//!   - [`core::corpus`] - [`Corpus`](core::Corpus)
//!   - [`core::output`] - Markdown renderers
//! - [`config`] - [`IngestConfig`](config::IngestConfig), [`RenderConfig`](config::RenderConfig)
//! - [`progress`] - Progress callbacks
//! - [`cli`] - CLI types (feature `cli`)
//! - [`error`] - Unified error types ([`ConvopackError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod progress;
pub mod record;

// Re-export the main types at the crate root for convenience
pub use error::{ConvopackError, Result};
pub use record::Record;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use convopack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Record;
    pub use crate::error::{ConvopackError, Result};

    // Configuration
    pub use crate::config::{IngestConfig, RenderConfig};

    // Ingestion
    pub use crate::ingest::{ArchiveIngestor, ArchiveOutcome, IngestReport, parse_payload};
    pub use crate::pipeline::{MergeSummary, merge_exports};

    // Core
    pub use crate::core::{
        Corpus, DedupStats, FlattenMode, Timestamp, Turn, deduplicate, flatten, flatten_with,
        sanitize_title,
    };

    // Output (file writers and string converters)
    pub use crate::core::output::{
        ExportStats, to_combined_markdown, to_record_markdown, write_combined_markdown,
        write_separate,
    };

    // Progress
    pub use crate::progress::{Progress, ProgressCallback};
}
