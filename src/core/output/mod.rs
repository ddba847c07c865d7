//! Markdown renderers.
//!
//! Two consumers of a [`Corpus`](crate::core::Corpus):
//! - [`write_combined_markdown`] / [`to_combined_markdown`] - one document with every conversation
//! - [`write_separate`] / [`to_record_markdown`] - one document per conversation
//!
//! Both flatten each conversation with
//! [`flatten_with`](crate::core::flatten::flatten_with) and normalize its
//! `create_time` with [`Timestamp`](crate::core::timestamp::Timestamp).
//! Output is deterministic for a given corpus and generation time.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> convopack::Result<()> {
//! use convopack::config::RenderConfig;
//! use convopack::core::Corpus;
//! use convopack::core::output::{write_combined_markdown, write_separate};
//!
//! let corpus = Corpus::load("master_conversations.json")?;
//! let config = RenderConfig::new();
//!
//! write_combined_markdown(&corpus, "conversations_readable.md", &config)?;
//! let stats = write_separate(&corpus, "conversations", &config)?;
//! println!("{} exported, {} failed", stats.exported, stats.failed);
//! # Ok(())
//! # }
//! ```

mod combined;
mod separate;

pub use combined::{to_combined_markdown, write_combined_markdown};
pub use separate::{ExportStats, record_file_name, to_record_markdown, write_separate};

use chrono::{DateTime, Local};

/// Marker written for a conversation that flattens to nothing.
pub const EMPTY_MARKER: &str = "*No messages found in this conversation.*";

/// Horizontal rule between sections.
pub(crate) const RULE: &str = "---";

pub(crate) fn stamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Title-cases a role name: `"assistant"` → `"Assistant"`, `"gpt-4o"` → `"Gpt-4O"`.
///
/// Every letter that follows a non-letter is upper-cased, the rest lower-cased.
pub fn role_label(role: &str) -> String {
    let mut label = String::with_capacity(role.len());
    let mut after_letter = false;
    for c in role.chars() {
        if after_letter {
            label.extend(c.to_lowercase());
        } else {
            label.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_label() {
        assert_eq!(role_label("user"), "User");
        assert_eq!(role_label("ASSISTANT"), "Assistant");
        assert_eq!(role_label("gpt-4o"), "Gpt-4O");
        assert_eq!(role_label("tool_call"), "Tool_Call");
        assert_eq!(role_label(""), "");
    }
}
