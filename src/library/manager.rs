//! Library workflows: adding with enrichment, deleting, updating, listing and
//! couplet paging.

use anyhow::anyhow;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::couplet::{couplet_for_page, render_couplet};
use super::error::{LibraryError, LibraryResult};
use super::params::{non_empty, parse_limit, parse_offset, parse_page, parse_song_id, ListSongsParams};
use crate::library_store::{DuplicateSongError, LibraryStore, Song, SongDetailUpdate, SongFilter};
use crate::release_date::parse_release_date;
use crate::song_details::SongDetailsProvider;

const SONG_EXISTS_MESSAGE: &str = "song already exists in the library for this group";
const UNKNOWN_ID_MESSAGE: &str = "ID does not exist";

/// Successful result of adding a song.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddSongOutcome {
    /// The song was stored and its details were filled from the details
    /// service.
    Enriched { id: i32 },
    /// The song was stored but the details service gave nothing usable, so
    /// its optional fields stay unset.
    WithoutDetails { id: i32 },
}

impl AddSongOutcome {
    pub fn id(&self) -> i32 {
        match self {
            AddSongOutcome::Enriched { id } | AddSongOutcome::WithoutDetails { id } => *id,
        }
    }
}

pub struct SongLibrary {
    store: Arc<dyn LibraryStore>,
    details_provider: Arc<dyn SongDetailsProvider>,
    pagination_limit: i32,
}

fn invalid_date(e: impl std::fmt::Display) -> LibraryError {
    LibraryError::Validation(format!(
        "incorrect date format, expected DD.MM.YYYY: {}",
        e
    ))
}

impl SongLibrary {
    pub fn new(
        store: Arc<dyn LibraryStore>,
        details_provider: Arc<dyn SongDetailsProvider>,
        pagination_limit: i32,
    ) -> Self {
        Self {
            store,
            details_provider,
            pagination_limit,
        }
    }

    /// Adds a song, creating its artist if needed, then tries to fill in its
    /// details.
    ///
    /// The insert is committed before the details service is called, so a
    /// song stays in the library even if enrichment later fails.
    pub async fn add_song(&self, artist: &str, title: &str) -> LibraryResult<AddSongOutcome> {
        // Names are stored and matched exactly as sent.
        if artist.trim().is_empty() || title.trim().is_empty() {
            return Err(LibraryError::Validation(
                "group and song must not be empty".to_string(),
            ));
        }

        let id = self.insert_song(artist, title)?;
        info!("Added song {} '{}' by '{}'", id, title, artist);

        let details = match self
            .details_provider
            .fetch_song_details(artist, title)
            .await
        {
            Ok(details) => details,
            Err(e) => {
                warn!("No details for song {}: {:#}", id, e);
                return Ok(AddSongOutcome::WithoutDetails { id });
            }
        };

        let release_date = parse_release_date(&details.release_date).map_err(|e| {
            anyhow!(
                "Details service sent an unusable release date for song {}: {}",
                id,
                e
            )
        })?;
        let update = SongDetailUpdate {
            release_date: Some(release_date),
            text: Some(details.text),
            link: Some(details.link),
        };
        if !self.store.update_song_details(id, &update)? {
            return Err(anyhow!("Song {} disappeared before its details were stored", id).into());
        }

        debug!("Stored details of song {}", id);
        Ok(AddSongOutcome::Enriched { id })
    }

    /// Inserts artist and song in a single write transaction.
    fn insert_song(&self, artist: &str, title: &str) -> LibraryResult<i32> {
        let tx = self.store.begin_transaction()?;

        let artist_id = match tx.get_artist_id(artist)? {
            Some(id) => id,
            None => tx.add_artist(artist)?,
        };

        if tx.song_exists(artist_id, title)? {
            debug!("Song '{}' by '{}' already exists", title, artist);
            return Err(LibraryError::Conflict(SONG_EXISTS_MESSAGE.to_string()));
        }

        let id = match tx.add_song(artist_id, title) {
            Ok(id) => id,
            Err(e) if e.downcast_ref::<DuplicateSongError>().is_some() => {
                debug!("{}", e);
                return Err(LibraryError::Conflict(SONG_EXISTS_MESSAGE.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tx.commit()?;
        Ok(id)
    }

    pub fn delete_song(&self, raw_id: &str) -> LibraryResult<()> {
        let id = parse_song_id(raw_id)?;
        if !self.store.delete_song(id)? {
            return Err(LibraryError::Validation(UNKNOWN_ID_MESSAGE.to_string()));
        }
        info!("Deleted song {}", id);
        Ok(())
    }

    /// Updates the optional details of a song. Empty strings leave the stored
    /// value unchanged.
    pub fn update_song(
        &self,
        id: i32,
        release_date: Option<String>,
        text: Option<String>,
        link: Option<String>,
    ) -> LibraryResult<()> {
        let release_date = match non_empty(release_date) {
            Some(raw) => Some(parse_release_date(&raw).map_err(invalid_date)?),
            None => None,
        };

        if id < 1 {
            return Err(LibraryError::Validation(UNKNOWN_ID_MESSAGE.to_string()));
        }

        let update = SongDetailUpdate {
            release_date,
            text: non_empty(text),
            link: non_empty(link),
        };
        if !self.store.update_song_details(id, &update)? {
            return Err(LibraryError::Validation(UNKNOWN_ID_MESSAGE.to_string()));
        }
        info!("Updated song {}", id);
        Ok(())
    }

    pub fn list_songs(&self, params: ListSongsParams) -> LibraryResult<Vec<Song>> {
        let release_date = match non_empty(params.release_date) {
            Some(raw) => Some(parse_release_date(&raw).map_err(invalid_date)?),
            None => None,
        };

        let filter = SongFilter {
            artist: non_empty(params.group),
            title: non_empty(params.song),
            release_date,
            text: non_empty(params.text),
            limit: parse_limit(params.limit.as_deref(), self.pagination_limit),
            offset: parse_offset(params.offset.as_deref()),
        };
        debug!("Listing songs with {:?}", filter);

        Ok(self.store.list_songs(&filter)?)
    }

    /// Returns the rendered couplet on `raw_page` of a song's lyrics. Songs
    /// without lyrics have a single empty couplet.
    pub fn get_couplet(&self, raw_id: &str, raw_page: &str) -> LibraryResult<String> {
        let id = parse_song_id(raw_id)?;
        let page = parse_page(raw_page)?;

        let song = match self.store.get_song_text(id) {
            Ok(Some(song)) => song,
            Ok(None) => return Err(LibraryError::Validation("invalid ID number".to_string())),
            Err(e) => {
                error!("Failed to read text of song {}: {:#}", id, e);
                return Err(LibraryError::Validation("invalid ID number".to_string()));
            }
        };

        let text = song.text.as_deref().unwrap_or_default();
        let couplet = couplet_for_page(text, page)
            .ok_or_else(|| LibraryError::Validation("page out of range".to_string()))?;
        Ok(render_couplet(&song.artist, &song.title, couplet))
    }
}
