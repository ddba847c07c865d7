//! Property-based tests for convopack.
//!
//! These tests generate random inputs to find edge cases.

use std::collections::HashSet;

use proptest::prelude::*;
use serde_json::{Value, json};

use convopack::core::flatten::flatten;
use convopack::core::naming::{MAX_TITLE_LEN, sanitize_title};
use convopack::core::processor::deduplicate;
use convopack::core::timestamp::Timestamp;
use convopack::Record;

/// A record with an optional id drawn from a small pool, so duplicates are common.
fn arb_record() -> impl Strategy<Value = (Option<&'static str>, usize)> {
    (
        prop::option::of(prop::sample::select(vec!["a", "b", "c", "d", "e"])),
        0usize..1000,
    )
}

fn build(id: Option<&str>, marker: usize) -> Record {
    let mut obj = serde_json::Map::new();
    if let Some(id) = id {
        obj.insert("id".into(), json!(id));
    }
    obj.insert("marker".into(), json!(marker));
    Record::from_map(obj)
}

fn marker(record: &Record) -> u64 {
    record.source()["marker"].as_u64().unwrap()
}

fn allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-')
}

proptest! {
    // ============================================
    // DEDUP PROPERTIES
    // ============================================

    /// Exactly the first record per id survives, in input order
    #[test]
    fn dedup_keeps_first_per_id(specs in prop::collection::vec(arb_record(), 0..40)) {
        let records: Vec<Record> = specs
            .iter()
            .enumerate()
            .map(|(i, (id, _))| build(*id, i))
            .collect();

        let mut seen = HashSet::new();
        let expected: Vec<u64> = specs
            .iter()
            .enumerate()
            .filter(|(_, (id, _))| match id {
                Some(id) => seen.insert(*id),
                None => true,
            })
            .map(|(i, _)| i as u64)
            .collect();

        let kept: Vec<u64> = deduplicate(records).iter().map(marker).collect();
        prop_assert_eq!(kept, expected);
    }

    /// Records without any identity all survive
    #[test]
    fn dedup_keeps_anonymous(n in 0usize..50) {
        let records: Vec<Record> = (0..n).map(|i| build(None, i)).collect();
        prop_assert_eq!(deduplicate(records).len(), n);
    }

    /// Dedup is idempotent
    #[test]
    fn dedup_idempotent(specs in prop::collection::vec(arb_record(), 0..40)) {
        let records: Vec<Record> = specs.iter().map(|(id, m)| build(*id, *m)).collect();
        let once = deduplicate(records);
        let twice = deduplicate(once.clone());
        prop_assert_eq!(once, twice);
    }

    // ============================================
    // SANITIZER PROPERTIES
    // ============================================

    /// Output is non-empty, short, and uses only the allowed charset
    #[test]
    fn sanitize_charset_and_length(title in any::<String>()) {
        let s = sanitize_title(&title);
        prop_assert!(!s.is_empty());
        prop_assert!(s.chars().count() <= MAX_TITLE_LEN);
        prop_assert!(s.chars().all(allowed));
        prop_assert_eq!(s.trim(), s.as_str());
    }

    /// Sanitizing twice changes nothing
    #[test]
    fn sanitize_idempotent(title in "[a-zA-Z0-9 _/:?!-]{0,80}") {
        let once = sanitize_title(&title);
        prop_assert_eq!(sanitize_title(&once), once.clone());
    }

    // ============================================
    // TIMESTAMP PROPERTIES
    // ============================================

    /// Epochs in a sane range always render as dates
    #[test]
    fn epoch_renders_as_date(seconds in 0i64..4_000_000_000) {
        let ts = Timestamp::from_value(Some(&json!(seconds)));
        let display = ts.display();
        let file_date = ts.file_date();
        prop_assert_eq!(display.len(), "YYYY-MM-DD HH:MM:SS".len());
        prop_assert_eq!(file_date.len(), "YYYY-MM-DD".len());
        prop_assert!(display.starts_with(&file_date));
    }

    /// Normalization never panics, whatever the value
    #[test]
    fn timestamp_total(text in any::<String>(), number in any::<f64>()) {
        let _ = Timestamp::from_value(Some(&Value::String(text))).normalize();
        let _ = Timestamp::from_epoch(number).normalize();
    }

    // ============================================
    // FLATTEN PROPERTIES
    // ============================================

    /// List form yields one turn per non-blank entry, in order
    #[test]
    fn list_flatten_preserves_order(contents in prop::collection::vec("[a-z ]{0,6}", 0..20)) {
        let messages: Vec<Value> = contents
            .iter()
            .map(|c| json!({"role": "user", "content": c}))
            .collect();
        let record = Record::from_value(json!({"messages": messages})).unwrap();

        let texts: Vec<String> = flatten(&record).into_iter().map(|t| t.text).collect();
        let expected: Vec<String> = contents
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();
        prop_assert_eq!(texts, expected);
    }
}
