//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own library database.

use super::constants::*;
use super::details_server::{DetailsBehavior, FakeDetailsService};
use song_library_server::server::{server::make_app, RequestsLoggingLevel, ServerConfig};
use song_library_server::{
    HttpSongDetailsClient, LibraryStore, NoOpSongDetailsProvider, SongDetailsProvider,
    SongLibrary, SqliteLibraryStore,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated library database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Library store for direct database access in tests
    pub store: Arc<dyn LibraryStore>,

    /// Fake details service, when the server was spawned with one
    pub details: Option<FakeDetailsService>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server without a details service. Every add answers with the
    /// "without details" message.
    pub async fn spawn() -> Self {
        Self::spawn_with_provider(Arc::new(NoOpSongDetailsProvider), None).await
    }

    /// Spawns a server backed by a fake details service behaving as requested
    pub async fn spawn_with_details(behavior: DetailsBehavior) -> Self {
        let details = FakeDetailsService::spawn(behavior).await;
        let client = HttpSongDetailsClient::new(&details.base_url, DETAILS_TIMEOUT_SECS)
            .expect("Failed to create details client");
        Self::spawn_with_provider(Arc::new(client), Some(details)).await
    }

    /// Spawns a server whose details client points at `url`
    pub async fn spawn_with_details_url(url: &str) -> Self {
        let client = HttpSongDetailsClient::new(url, DETAILS_TIMEOUT_SECS)
            .expect("Failed to create details client");
        Self::spawn_with_provider(Arc::new(client), None).await
    }

    /// This function:
    /// 1. Creates a temporary library database
    /// 2. Binds to a random port (127.0.0.1:0)
    /// 3. Spawns the server in a background task
    /// 4. Waits for the server to be ready
    async fn spawn_with_provider(
        provider: Arc<dyn SongDetailsProvider>,
        details: Option<FakeDetailsService>,
    ) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");
        let store: Arc<dyn LibraryStore> = Arc::new(
            SqliteLibraryStore::new(temp_db_dir.path().join("library.db"), 2)
                .expect("Failed to open library store"),
        );
        let library = SongLibrary::new(store.clone(), provider, DEFAULT_PAGINATION_LIMIT);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
        };
        let app = make_app(config, library);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            store,
            details,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
