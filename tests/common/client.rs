//! HTTP client for end-to-end tests
//!
//! This module wraps reqwest and provides methods for all library-server
//! endpoints. When API routes or request formats change, update only this
//! file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Status
    // ========================================================================

    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Library Endpoints
    // ========================================================================

    /// POST /library/add with the `group`/`song` field names
    pub async fn add_song(&self, artist: &str, title: &str) -> Response {
        self.add_song_json(json!({ "group": artist, "song": title }))
            .await
    }

    pub async fn add_song_json(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/library/add", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Add song request failed")
    }

    /// POST /library/add with an arbitrary raw body
    pub async fn add_song_raw(&self, body: &str) -> Response {
        self.client
            .post(format!("{}/library/add", self.base_url))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Add song request failed")
    }

    /// Adds a song and returns its ID, whichever success status the server
    /// picks.
    pub async fn add_song_id(&self, artist: &str, title: &str) -> i32 {
        let response = self.add_song(artist, title).await;
        let status = response.status();
        let body = response.text().await.expect("Failed to read add response");
        match status {
            reqwest::StatusCode::CREATED => {
                let value: Value = serde_json::from_str(&body).expect("Add response is not JSON");
                value["id"].as_i64().expect("Add response has no id") as i32
            }
            reqwest::StatusCode::OK => body
                .lines()
                .next()
                .and_then(|line| line.strip_prefix("Song ID: "))
                .and_then(|id| id.parse().ok())
                .expect("Add response has no song ID line"),
            other => panic!("Adding song failed with {}: {}", other, body),
        }
    }

    pub async fn delete_song(&self, id: &str) -> Response {
        self.client
            .delete(format!("{}/library/delete", self.base_url))
            .query(&[("id", id)])
            .send()
            .await
            .expect("Delete song request failed")
    }

    pub async fn update_song(&self, body: Value) -> Response {
        self.client
            .put(format!("{}/library/update", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Update song request failed")
    }

    /// GET /library/list with the given query parameters
    pub async fn list_songs(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/library/list", self.base_url))
            .query(query)
            .send()
            .await
            .expect("List songs request failed")
    }

    /// Lists songs and returns the parsed JSON array, asserting success
    pub async fn list_songs_json(&self, query: &[(&str, &str)]) -> Vec<Value> {
        let response = self.list_songs(query).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("List response is not a JSON array")
    }

    pub async fn get_couplet(&self, id: &str, page: &str) -> Response {
        self.client
            .get(format!("{}/song/couplet", self.base_url))
            .query(&[("id", id), ("page", page)])
            .send()
            .await
            .expect("Couplet request failed")
    }
}
