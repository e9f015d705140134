//! Lookup of supplementary song metadata (lyrics, link, release date) from an
//! external service.

mod client;
mod models;

pub use client::HttpSongDetailsClient;
pub use models::SongDetails;

use anyhow::{bail, Result};
use async_trait::async_trait;

/// Source of song details used to enrich freshly added songs.
///
/// Any error means "no details available"; callers never retry.
#[async_trait]
pub trait SongDetailsProvider: Send + Sync {
    async fn fetch_song_details(&self, artist: &str, title: &str) -> Result<SongDetails>;
}

/// Provider used when no details service is configured. Every lookup fails,
/// so songs are stored without details.
pub struct NoOpSongDetailsProvider;

#[async_trait]
impl SongDetailsProvider for NoOpSongDetailsProvider {
    async fn fetch_song_details(&self, _artist: &str, _title: &str) -> Result<SongDetails> {
        bail!("No song details service configured")
    }
}
