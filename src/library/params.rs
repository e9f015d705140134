//! Parsing of raw request parameters into workflow inputs.
//!
//! Query parameters arrive as optional strings; an absent parameter behaves
//! exactly like an empty one.

use serde::Deserialize;

use super::error::{LibraryError, LibraryResult};

/// Raw query of `GET /library/list`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListSongsParams {
    pub group: Option<String>,
    pub song: Option<String>,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Parses a song ID, which must be a positive 32-bit integer.
pub fn parse_song_id(raw: &str) -> LibraryResult<i32> {
    match raw.parse::<i32>() {
        Ok(id) if id >= 1 => Ok(id),
        Ok(id) => Err(LibraryError::Validation(format!(
            "ID < 1 or out of range: {}",
            id
        ))),
        Err(e) => Err(LibraryError::Validation(format!(
            "ID < 1 or {}: '{}'",
            e, raw
        ))),
    }
}

/// Page size of a listing. Anything unparsable or not positive falls back to
/// `default_limit`.
pub fn parse_limit(raw: Option<&str>, default_limit: i32) -> i32 {
    match raw.and_then(|s| s.parse::<i32>().ok()) {
        Some(limit) if limit > 0 => limit,
        _ => default_limit,
    }
}

/// Listing offset. Anything unparsable or negative falls back to 0.
pub fn parse_offset(raw: Option<&str>) -> i32 {
    match raw.and_then(|s| s.parse::<i32>().ok()) {
        Some(offset) if offset >= 0 => offset,
        _ => 0,
    }
}

pub fn parse_page(raw: &str) -> LibraryResult<i64> {
    raw.parse::<i64>().map_err(|_| {
        LibraryError::Validation("invalid string to number conversion or PAGE number".to_string())
    })
}

/// Turns an absent or empty string into `None`.
pub fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}
