//! HTTP client for the external song details service.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::models::SongDetails;
use super::SongDetailsProvider;

/// HTTP client for the song details service.
pub struct HttpSongDetailsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSongDetailsClient {
    /// Create a new song details client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the details service (e.g., "http://localhost:8081")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: &str, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    fn info_url(&self, artist: &str, title: &str) -> String {
        format!(
            "{}/info?group={}&song={}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        )
    }
}

#[async_trait]
impl SongDetailsProvider for HttpSongDetailsClient {
    async fn fetch_song_details(&self, artist: &str, title: &str) -> Result<SongDetails> {
        let url = self.info_url(artist, title);
        debug!("Fetching song details from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to connect to song details service")?;

        if !response.status().is_success() {
            bail!(
                "Failed to fetch details of '{}' by '{}': status {}",
                title,
                artist,
                response.status()
            );
        }

        response
            .json()
            .await
            .context("Failed to parse song details response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::collections::HashMap;

    async fn spawn_details_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn info_url_encodes_query_and_trims_slash() {
        let client = HttpSongDetailsClient::new("http://details.local/", 5).unwrap();
        assert_eq!(
            client.info_url("AC/DC", "Rock & Roll"),
            "http://details.local/info?group=AC%2FDC&song=Rock%20%26%20Roll"
        );
    }

    #[tokio::test]
    async fn fetches_details_for_requested_song() {
        let router = Router::new().route(
            "/info",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                Json(serde_json::json!({
                    "releaseDate": "16.07.2006",
                    "text": format!("{} by {}", q["song"], q["group"]),
                    "link": "https://example.com/watch",
                }))
            }),
        );
        let base_url = spawn_details_service(router).await;

        let client = HttpSongDetailsClient::new(&base_url, 5).unwrap();
        let details = client
            .fetch_song_details("Muse", "Supermassive Black Hole")
            .await
            .unwrap();

        assert_eq!(details.release_date, "16.07.2006");
        assert_eq!(details.text, "Supermassive Black Hole by Muse");
        assert_eq!(details.link, "https://example.com/watch");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let router = Router::new().route("/info", get(|| async { StatusCode::NOT_FOUND }));
        let base_url = spawn_details_service(router).await;

        let client = HttpSongDetailsClient::new(&base_url, 5).unwrap();
        assert!(client.fetch_song_details("Muse", "Unknown").await.is_err());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let router = Router::new().route("/info", get(|| async { "not json" }));
        let base_url = spawn_details_service(router).await;

        let client = HttpSongDetailsClient::new(&base_url, 5).unwrap();
        assert!(client.fetch_song_details("Muse", "Uprising").await.is_err());
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        let client = HttpSongDetailsClient::new("http://127.0.0.1:1", 1).unwrap();
        assert!(client.fetch_song_details("Muse", "Uprising").await.is_err());
    }
}
