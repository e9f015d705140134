//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, TEST_ARTIST, TEST_TITLE};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_add_song() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.add_song(TEST_ARTIST, TEST_TITLE).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

#![allow(dead_code)] // Each test binary uses a different subset

mod client;
mod constants;
mod details_server;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use details_server::{DetailsBehavior, FakeDetailsService};
pub use server::TestServer;
