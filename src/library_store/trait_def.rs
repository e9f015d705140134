//! Persistence contract of the song library.
//!
//! Single-statement operations live on [`LibraryStore`]. The multi-step add
//! workflow runs through a [`LibraryTransaction`], which is rolled back unless
//! explicitly committed.

use anyhow::Result;

use super::models::{Song, SongDetailUpdate, SongFilter, SongText};

/// Operations available inside an open write transaction.
pub trait LibraryTransaction {
    /// Looks up an artist by exact name.
    fn get_artist_id(&self, name: &str) -> Result<Option<i64>>;

    /// Inserts a new artist and returns its ID.
    fn add_artist(&self, name: &str) -> Result<i64>;

    fn song_exists(&self, artist_id: i64, title: &str) -> Result<bool>;

    /// Inserts a song with only artist and title set and returns its ID.
    ///
    /// Fails with [`super::DuplicateSongError`] if the pair already exists.
    fn add_song(&self, artist_id: i64, title: &str) -> Result<i32>;

    /// Commits the transaction. Dropping without committing rolls back.
    fn commit(self: Box<Self>) -> Result<()>;
}

/// Trait for song library storage backends.
pub trait LibraryStore: Send + Sync {
    /// Opens a write transaction. Other writers wait until it is committed or
    /// dropped.
    fn begin_transaction(&self) -> Result<Box<dyn LibraryTransaction + '_>>;

    fn get_song(&self, id: i32) -> Result<Option<Song>>;

    /// Get the lyrics of a song along with its artist and title.
    fn get_song_text(&self, id: i32) -> Result<Option<SongText>>;

    /// Applies a partial update. Returns false if no song has this ID.
    fn update_song_details(&self, id: i32, update: &SongDetailUpdate) -> Result<bool>;

    /// Deletes a song. Returns false if no song has this ID.
    fn delete_song(&self, id: i32) -> Result<bool>;

    /// Lists songs matching the filter, ordered by ascending ID.
    fn list_songs(&self, filter: &SongFilter) -> Result<Vec<Song>>;

    fn get_songs_count(&self) -> Result<usize>;
}
