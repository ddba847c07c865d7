//! Decoding of the conversations member found inside an export archive.

use serde_json::Value;
use tracing::warn;

use crate::record::Record;

/// Decodes an archive payload into conversations.
///
/// A single conversation object becomes a one-element list. Array entries
/// that are not objects are dropped. Any other JSON value (string, number,
/// `null`, ...) yields no conversations.
///
/// # Errors
///
/// Fails only when `content` is not valid JSON.
///
/// ```
/// use convopack::ingest::parse_payload;
///
/// let records = parse_payload(br#"{"id": "a", "title": "One"}"#).unwrap();
/// assert_eq!(records.len(), 1);
///
/// assert!(parse_payload(b"[]").unwrap().is_empty());
/// assert!(parse_payload(b"\"text\"").unwrap().is_empty());
/// assert!(parse_payload(b"{oops").is_err());
/// ```
pub fn parse_payload(content: &[u8]) -> serde_json::Result<Vec<Record>> {
    let records = match serde_json::from_slice::<Value>(content)? {
        Value::Object(map) => vec![Record::from_map(map)],
        Value::Array(entries) => {
            let total = entries.len();
            let records: Vec<Record> = entries.into_iter().filter_map(Record::from_value).collect();
            if records.len() < total {
                warn!(
                    dropped = total - records.len(),
                    "payload contained entries that are not conversation objects"
                );
            }
            records
        }
        _ => Vec::new(),
    };
    Ok(records)
}
