//! Release date handling.
//!
//! Dates cross the HTTP boundary as `DD.MM.YYYY` (two-digit day, two-digit
//! month, four-digit year) and are persisted as ISO `YYYY-MM-DD` text.

use chrono::NaiveDate;
use serde::Serializer;
use thiserror::Error;

const WIRE_FORMAT: &str = "%d.%m.%Y";
const STORAGE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseDateError {
    #[error("expected DD.MM.YYYY, got '{0}'")]
    Malformed(String),

    #[error("'{0}' is not a valid calendar date")]
    InvalidDate(String),
}

/// Parses a `DD.MM.YYYY` date.
///
/// The shape is checked before handing the string to chrono, which would
/// otherwise accept unpadded days and months such as `2.1.2006`.
pub fn parse_release_date(raw: &str) -> Result<NaiveDate, ReleaseDateError> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[2] == b'.'
        && bytes[5] == b'.'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    if !well_formed {
        return Err(ReleaseDateError::Malformed(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, WIRE_FORMAT)
        .map_err(|_| ReleaseDateError::InvalidDate(raw.to_string()))
}

pub fn format_release_date(date: &NaiveDate) -> String {
    date.format(WIRE_FORMAT).to_string()
}

pub fn to_storage(date: &NaiveDate) -> String {
    date.format(STORAGE_FORMAT).to_string()
}

pub fn from_storage(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, STORAGE_FORMAT).ok()
}

/// serde helper rendering an optional date in the wire format, or `null`.
pub fn serialize_optional<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&format_release_date(date)),
        None => serializer.serialize_none(),
    }
}
