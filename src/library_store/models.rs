use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::release_date;

/// A song as returned by listing queries, with its artist name denormalized.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Song {
    pub id: i32,
    #[serde(rename = "group")]
    pub artist: String,
    #[serde(rename = "song")]
    pub title: String,
    #[serde(
        rename = "releaseDate",
        serialize_with = "release_date::serialize_optional"
    )]
    pub release_date: Option<NaiveDate>,
    pub text: Option<String>,
    pub link: Option<String>,
}

/// Lyrics of a single song together with the names needed to present them.
#[derive(Clone, Debug, PartialEq)]
pub struct SongText {
    pub artist: String,
    pub title: String,
    pub text: Option<String>,
}

/// Partial update of the optional song columns.
///
/// `None` leaves the stored column untouched; there is no way to clear a
/// column through this type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SongDetailUpdate {
    pub release_date: Option<NaiveDate>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl SongDetailUpdate {
    pub fn is_empty(&self) -> bool {
        self.release_date.is_none() && self.text.is_none() && self.link.is_none()
    }
}

/// Listing predicate. Every `None` field is left out of the query.
#[derive(Clone, Debug, PartialEq)]
pub struct SongFilter {
    /// Case-insensitive substring of the artist name.
    pub artist: Option<String>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// Substring the lyrics must contain.
    pub text: Option<String>,
    pub limit: i32,
    pub offset: i32,
}

impl SongFilter {
    pub fn unfiltered(limit: i32) -> Self {
        Self {
            artist: None,
            title: None,
            release_date: None,
            text: None,
            limit,
            offset: 0,
        }
    }
}

/// Raised by the store when inserting a song violates the (artist, title)
/// uniqueness constraint.
#[derive(Debug, Error)]
#[error("song '{title}' already exists for artist {artist_id}")]
pub struct DuplicateSongError {
    pub artist_id: i64,
    pub title: String,
}
