//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Command`] - The pipeline stages, one subcommand each
//! - [`Branch`] - Which messages of a branching conversation to render
//!
//! # Using Branch in Libraries
//!
//! ```rust
//! use convopack::cli::Branch;
//! use convopack::core::flatten::FlattenMode;
//!
//! let branch: Branch = "main-line".parse().unwrap();
//! assert_eq!(FlattenMode::from(branch), FlattenMode::MainLine);
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MEMBER_NAME;
use crate::core::flatten::FlattenMode;

/// Merge ChatGPT export archives into one deduplicated corpus and render
/// it as readable Markdown.
#[derive(Parser, Debug, Clone)]
#[command(name = "convopack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    convopack merge exports/
    convopack merge exports/ -o master.json --extract-dir extracted/
    convopack render master_conversations.json
    convopack split master_conversations.json -d conversations/ --branch main-line
    convopack run exports/ --out-dir archive/")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Pipeline stages.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract, merge and deduplicate conversations from export archives
    Merge {
        /// Directory containing the export archives
        exports_dir: PathBuf,

        /// Path of the master corpus file
        #[arg(short, long, default_value = "master_conversations.json")]
        output: PathBuf,

        /// Keep a copy of every extracted payload in this directory
        #[arg(long, value_name = "DIR")]
        extract_dir: Option<PathBuf>,

        /// Archive member holding the conversations
        #[arg(long, value_name = "NAME", default_value = DEFAULT_MEMBER_NAME)]
        member: String,
    },

    /// Render the master corpus as a single Markdown document
    Render {
        /// Master corpus file
        master: PathBuf,

        /// Path of the Markdown document
        #[arg(short, long, default_value = "conversations_readable.md")]
        output: PathBuf,

        /// Which messages of a branching conversation to render
        #[arg(short, long, value_enum, default_value = "insertion")]
        branch: Branch,
    },

    /// Render every conversation of the master corpus to its own Markdown file
    Split {
        /// Master corpus file
        master: PathBuf,

        /// Output directory
        #[arg(short = 'd', long, default_value = "conversations")]
        output_dir: PathBuf,

        /// Which messages of a branching conversation to render
        #[arg(short, long, value_enum, default_value = "insertion")]
        branch: Branch,
    },

    /// Merge, render and split in one go
    Run {
        /// Directory containing the export archives
        exports_dir: PathBuf,

        /// Directory receiving every artifact
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Which messages of a branching conversation to render
        #[arg(short, long, value_enum, default_value = "insertion")]
        branch: Branch,
    },
}

/// Which messages of a branching conversation to render.
///
/// - [`Insertion`](Branch::Insertion) - every message, in stored order
/// - [`MainLine`](Branch::MainLine) - only the path leading to the current message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Branch {
    /// All messages in stored order (default)
    #[default]
    Insertion,

    /// Root-to-current path only
    #[value(alias = "main")]
    #[serde(alias = "main")]
    MainLine,
}

impl Branch {
    /// Returns all accepted names (including aliases).
    pub fn all_names() -> &'static [&'static str] {
        &["insertion", "main-line", "main"]
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Branch::Insertion => write!(f, "insertion"),
            Branch::MainLine => write!(f, "main-line"),
        }
    }
}

impl std::str::FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "insertion" => Ok(Branch::Insertion),
            "main-line" | "main" => Ok(Branch::MainLine),
            _ => Err(format!(
                "Unknown branch mode: '{}'. Expected one of: {}",
                s,
                Branch::all_names().join(", ")
            )),
        }
    }
}

impl From<Branch> for FlattenMode {
    fn from(branch: Branch) -> FlattenMode {
        match branch {
            Branch::Insertion => FlattenMode::InsertionOrder,
            Branch::MainLine => FlattenMode::MainLine,
        }
    }
}
