//! Best-effort timestamp normalization.
//!
//! Conversation exports store `create_time` as a float epoch, but older
//! archives and hand-edited files also carry numeric strings, ISO strings or
//! nothing at all. [`Timestamp`] captures that shape once, and
//! [`Timestamp::normalize`] turns it into display and file-name strings
//! without ever failing.
//!
//! ```
//! use convopack::core::timestamp::{Timestamp, UNKNOWN_DATE};
//!
//! let ts = Timestamp::parse_str("yesterday");
//! assert_eq!(ts.display(), "yesterday");
//! assert_eq!(ts.file_date(), UNKNOWN_DATE);
//! ```

use chrono::{DateTime, Datelike, Local, TimeZone};
use serde_json::Value;

/// Display sentinel for a missing timestamp.
pub const UNKNOWN_DISPLAY: &str = "Unknown";

/// File-name sentinel for any timestamp that is not a usable epoch.
pub const UNKNOWN_DATE: &str = "unknown-date";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A timestamp of unknown provenance.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Timestamp {
    /// Unix epoch seconds, with the text it was read from.
    Epoch { seconds: f64, raw: String },
    /// Any other non-empty value, kept verbatim.
    Text(String),
    /// Absent, null or empty.
    #[default]
    Missing,
}

/// Both renderings of a [`Timestamp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    /// `YYYY-MM-DD HH:MM:SS`, the verbatim text, or `"Unknown"`.
    pub display: String,
    /// `YYYY-MM-DD` or `"unknown-date"`.
    pub file_date: String,
}

impl Timestamp {
    /// Reads a timestamp from an optional JSON value.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Timestamp::Missing,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(seconds) => Timestamp::Epoch {
                    seconds,
                    raw: n.to_string(),
                },
                None => Timestamp::Text(n.to_string()),
            },
            Some(Value::String(s)) => Self::parse_str(s),
            Some(other) => Timestamp::Text(other.to_string()),
        }
    }

    /// Reads a timestamp from a string.
    ///
    /// Digits with at most one decimal point are an epoch; anything else is text.
    pub fn parse_str(s: &str) -> Self {
        if s.is_empty() {
            return Timestamp::Missing;
        }
        if is_numeric_epoch(s) {
            if let Ok(seconds) = s.parse::<f64>() {
                return Timestamp::Epoch {
                    seconds,
                    raw: s.to_string(),
                };
            }
        }
        Timestamp::Text(s.to_string())
    }

    /// Creates an epoch timestamp from seconds.
    pub fn from_epoch(seconds: f64) -> Self {
        Timestamp::Epoch {
            seconds,
            raw: seconds.to_string(),
        }
    }

    /// Returns `true` if there is no timestamp at all.
    pub fn is_missing(&self) -> bool {
        matches!(self, Timestamp::Missing)
    }

    /// Converts an epoch to local time.
    ///
    /// Returns `None` for text, missing values and epochs outside years 1..=9999.
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        match self {
            Timestamp::Epoch { seconds, .. } => epoch_to_local(*seconds),
            _ => None,
        }
    }

    /// Display form: `YYYY-MM-DD HH:MM:SS`, verbatim text, or `"Unknown"`.
    pub fn display(&self) -> String {
        match (self.to_local(), self) {
            (Some(dt), _) => dt.format(DISPLAY_FORMAT).to_string(),
            (None, Timestamp::Epoch { raw, .. } | Timestamp::Text(raw)) => raw.clone(),
            (None, Timestamp::Missing) => UNKNOWN_DISPLAY.to_string(),
        }
    }

    /// File-name form: `YYYY-MM-DD` or `"unknown-date"`.
    pub fn file_date(&self) -> String {
        self.to_local()
            .map(|dt| dt.format(FILE_DATE_FORMAT).to_string())
            .unwrap_or_else(|| UNKNOWN_DATE.to_string())
    }

    /// Both forms at once.
    pub fn normalize(&self) -> NormalizedTimestamp {
        NormalizedTimestamp {
            display: self.display(),
            file_date: self.file_date(),
        }
    }

    /// The source text, used as a last-resort identity key.
    pub fn identity(&self) -> Option<&str> {
        match self {
            Timestamp::Epoch { raw, .. } | Timestamp::Text(raw) => Some(raw),
            Timestamp::Missing => None,
        }
    }
}

fn is_numeric_epoch(s: &str) -> bool {
    let mut digits = 0;
    let mut dots = 0;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

fn epoch_to_local(seconds: f64) -> Option<DateTime<Local>> {
    if !seconds.is_finite() || seconds.abs() >= 1e15 {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    let dt = Local
        .timestamp_opt(whole as i64, nanos.min(999_999_999))
        .earliest()?;
    (1..=9999).contains(&dt.year()).then_some(dt)
}
