//! The master corpus: deduplicated conversations persisted between merging and rendering.
//!
//! On disk the corpus is a JSON array of conversation objects, pretty-printed
//! with two-space indentation and with non-ASCII text written as-is.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::error::{ConvopackError, Result};
use crate::record::Record;

/// An ordered, read-only collection of conversations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    records: Vec<Record>,
}

impl Corpus {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Loads a corpus file.
    ///
    /// Fails with [`ConvopackError::InvalidCorpus`] if the file is not a JSON
    /// array. Array entries that are not objects are dropped with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConvopackError::missing_input(path));
        }
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content).map_err(|e| match e {
            ConvopackError::Json(err) => ConvopackError::invalid_corpus(path, err.to_string()),
            ConvopackError::InvalidCorpus { message, .. } => {
                ConvopackError::invalid_corpus(path, message)
            }
            other => other,
        })
    }

    /// Parses corpus JSON from a string.
    pub fn parse_str(content: &str) -> Result<Self> {
        let Value::Array(entries) = serde_json::from_str::<Value>(content)? else {
            return Err(ConvopackError::invalid_corpus(
                "<string>",
                "expected a JSON array of conversations",
            ));
        };

        let total = entries.len();
        let records: Vec<Record> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let record = Record::from_value(entry);
                if record.is_none() {
                    warn!(position = idx + 1, "dropping corpus entry that is not an object");
                }
                record
            })
            .collect();

        if records.len() < total {
            warn!(dropped = total - records.len(), "corpus contained non-object entries");
        }
        Ok(Self { records })
    }

    /// Serializes the corpus as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Writes the corpus file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &self.records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl From<Vec<Record>> for Corpus {
    fn from(records: Vec<Record>) -> Self {
        Self::from_records(records)
    }
}
