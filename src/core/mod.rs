//! Core processing logic for convopack.
//!
//! This module contains:
//! - [`timestamp`] - Coercing `create_time` values into display strings and file dates
//! - [`naming`] - File-system-safe titles and collision-free output paths
//! - [`flatten`] - Linearizing a conversation into `(role, text)` turns
//! - [`processor`] - Deduplication and statistics
//! - [`corpus`] - The master corpus file
//! - [`output`] - Markdown renderers
//!
//! # Quick Start
//!
//! ```rust
//! use convopack::core::{Corpus, deduplicate, flatten};
//! use convopack::Record;
//! use serde_json::json;
//!
//! let records: Vec<Record> = [
//!     json!({"id": "a", "messages": [{"role": "user", "content": "hi"}]}),
//!     json!({"id": "a"}),
//! ]
//! .into_iter()
//! .filter_map(Record::from_value)
//! .collect();
//!
//! let corpus = Corpus::from_records(deduplicate(records));
//! assert_eq!(corpus.len(), 1);
//! assert_eq!(flatten(&corpus.records()[0]).len(), 1);
//! ```

pub mod corpus;
pub mod flatten;
pub mod naming;
pub mod output;
pub mod processor;
pub mod timestamp;

pub use corpus::Corpus;
pub use flatten::{FlattenMode, Turn, flatten, flatten_with};
pub use naming::{claim_unique_file, claim_unique_file_within, sanitize_title};
pub use output::{
    ExportStats, to_combined_markdown, to_record_markdown, write_combined_markdown,
    write_separate,
};
pub use processor::{DedupStats, deduplicate, deduplicate_with_stats};
pub use timestamp::{NormalizedTimestamp, Timestamp};
