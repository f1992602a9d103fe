// ABOUTME: Normalizes arbitrary backend values into display strings
// ABOUTME: Handles nulls, arrays, stringified JSON, and ISO timestamps

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use llc_core::constants::IMAGE_EXTENSIONS;

/// Placeholder rendered for absent or empty values.
pub const PLACEHOLDER: &str = "\u{2014}";

/// Normalize a backend value into the string shown in a table cell.
///
/// Never panics: any shape of value produces some string, with absent
/// and empty values collapsing to [`PLACEHOLDER`].
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => display_string(s),
        Value::Array(items) => {
            if items.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                items
                    .iter()
                    .map(display_scalar)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_else(|_| PLACEHOLDER.to_string()),
    }
}

fn display_string(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER.to_string();
    }
    // Some fields arrive stringified, e.g. `["a","b"]` or `{"a":1}`. Parse
    // and re-normalize; anything that fails to parse passes through as-is.
    let bracketed = (trimmed.starts_with('[') && trimmed.ends_with(']'))
        || (trimmed.starts_with('{') && trimmed.ends_with('}'));
    if bracketed {
        if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
            return display_value(&parsed);
        }
    }
    if let Some(formatted) = try_format_timestamp(trimmed) {
        return formatted;
    }
    trimmed.to_string()
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                trimmed.to_string()
            }
        }
        other => display_value(other),
    }
}

/// Detects an ISO-8601 timestamp prefix (`YYYY-MM-DDT...`) and reformats it
/// for display. Strings that merely look like a timestamp but do not parse
/// are left to the caller unchanged.
fn try_format_timestamp(s: &str) -> Option<String> {
    if !has_iso_date_prefix(s) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(format_date(&dt.with_timezone(&Utc)));
    }
    // Timestamps without an offset, e.g. "2024-06-01T08:30:00"
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.format("%Y-%m-%d %H:%M").to_string());
    }
    None
}

fn has_iso_date_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() > 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5].is_ascii_digit()
        && b[6].is_ascii_digit()
        && b[7] == b'-'
        && b[8].is_ascii_digit()
        && b[9].is_ascii_digit()
        && b[10] == b'T'
}

/// Full display form of a timestamp, minute precision.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Display form of an optional timestamp, placeholder when absent.
pub fn format_opt_date(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(format_date).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Whether a filename should be rendered as an image thumbnail.
pub fn is_image(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
