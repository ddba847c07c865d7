//! Corpus deduplication and statistics.

use std::collections::HashSet;

use crate::record::Record;

/// Drops records whose identity key was already seen.
///
/// First occurrence wins and the relative order of kept records is
/// preserved. Records without an identity key are always kept.
///
/// # Example
///
/// ```
/// use convopack::core::processor::deduplicate;
/// use convopack::Record;
/// use serde_json::json;
///
/// let records: Vec<Record> = [
///     json!({"id": "a", "title": "first"}),
///     json!({"id": "a", "title": "second"}),
///     json!({}),
///     json!({}),
/// ]
/// .into_iter()
/// .filter_map(Record::from_value)
/// .collect();
///
/// let unique = deduplicate(records);
/// assert_eq!(unique.len(), 3);
/// assert_eq!(unique[0].title(), Some("first"));
/// ```
pub fn deduplicate(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::new();

    records
        .into_iter()
        .filter(|record| match record.identity_key() {
            Some(key) => seen.insert(key.to_string()),
            None => true,
        })
        .collect()
}

/// Statistics about a deduplication pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    pub original_count: usize,
    pub unique_count: usize,
}

impl DedupStats {
    pub fn new(original_count: usize, unique_count: usize) -> Self {
        Self {
            original_count,
            unique_count,
        }
    }

    /// Number of records dropped as duplicates.
    pub fn duplicates(&self) -> usize {
        self.original_count.saturating_sub(self.unique_count)
    }

    /// Percentage of records dropped (0.0 - 100.0).
    pub fn duplicate_ratio(&self) -> f64 {
        if self.original_count == 0 {
            return 0.0;
        }
        (self.duplicates() as f64 / self.original_count as f64) * 100.0
    }
}

/// Deduplicates and reports what happened.
pub fn deduplicate_with_stats(records: Vec<Record>) -> (Vec<Record>, DedupStats) {
    let original_count = records.len();
    let unique = deduplicate(records);
    let stats = DedupStats::new(original_count, unique.len());
    (unique, stats)
}
