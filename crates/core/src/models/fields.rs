//! Field lookup over loosely-shaped JSON records.
//!
//! Source files were written by several generations of tooling, so the same
//! field may appear under a French or an English key. Every lookup takes an
//! ordered list of candidate keys and the first key present wins.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::{Map, Value};

/// Return the value of the first candidate key present in `record`.
///
/// A key holding `null` counts as absent.
pub fn first_present<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .find(|v| !v.is_null())
}

/// First candidate that holds a string. Numbers are rendered as text so ids
/// written as integers still resolve.
pub fn str_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match first_present(record, keys)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Like [`str_field`] but falls back to `default` and never returns `None`.
pub fn str_or(record: &Map<String, Value>, keys: &[&str], default: &str) -> String {
    str_field(record, keys).unwrap_or_else(|| default.to_string())
}

/// First candidate, which must be a JSON number. Any other type yields `None`
/// so the caller's default applies.
pub fn num_field(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    first_present(record, keys)?.as_f64().filter(|n| n.is_finite())
}

/// Numeric field defaulting to `0.0` when absent or wrong-typed.
pub fn num_or_zero(record: &Map<String, Value>, keys: &[&str]) -> f64 {
    num_field(record, keys).unwrap_or(0.0)
}

/// Integer field. Floats are rounded; anything else yields `None`.
pub fn int_field(record: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    let value = first_present(record, keys)?;
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
}

/// Boolean field. Accepts JSON booleans only.
pub fn bool_field(record: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    first_present(record, keys)?.as_bool()
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse the calendar date part of a date or date-time string.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 and `YYYY-MM-DD HH:MM[:SS]`.
/// The date is taken as written, without shifting it to local time.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .map(|dt| dt.date())
}

/// Parse a timestamp in local time.
///
/// Accepts RFC 3339, naive `YYYY-MM-DD[T ]HH:MM[:SS[.f]]` (read as local
/// time) and a bare date (midnight local).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Local.from_local_datetime(&naive).earliest()
}

/// Date field parsed with [`parse_date`].
pub fn date_field(record: &Map<String, Value>, keys: &[&str]) -> Option<NaiveDate> {
    str_field(record, keys).and_then(|s| parse_date(&s))
}
