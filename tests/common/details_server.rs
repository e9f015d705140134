//! Fake song details service
//!
//! Serves `GET /info?group=&song=` the way the real details service does, with
//! switchable misbehaviors to exercise the degraded paths of song adding.

use super::constants::*;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailsBehavior {
    /// Answer with the details from the constants module
    Serve,
    /// Answer 200 with a release date in the wrong format
    MalformedDate,
    /// Answer 200 with a body that has no release date
    MissingReleaseDate,
    /// Answer 404
    NotFound,
}

#[derive(Deserialize)]
struct InfoQuery {
    group: Option<String>,
    song: Option<String>,
}

struct DetailsState {
    behavior: DetailsBehavior,
    requests: AtomicUsize,
    last_query: Mutex<Option<(String, String)>>,
}

async fn info(State(state): State<Arc<DetailsState>>, Query(query): Query<InfoQuery>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    *state.last_query.lock().unwrap() = Some((
        query.group.unwrap_or_default(),
        query.song.unwrap_or_default(),
    ));

    let release_date = match state.behavior {
        DetailsBehavior::NotFound => return StatusCode::NOT_FOUND.into_response(),
        DetailsBehavior::MissingReleaseDate => {
            return Json(serde_json::json!({
                "text": DETAILS_TEXT,
                "link": DETAILS_LINK,
            }))
            .into_response()
        }
        DetailsBehavior::MalformedDate => "2006-07-16",
        DetailsBehavior::Serve => DETAILS_RELEASE_DATE,
    };
    Json(serde_json::json!({
        "releaseDate": release_date,
        "text": DETAILS_TEXT,
        "link": DETAILS_LINK,
    }))
    .into_response()
}

/// Fake details service running on a random port until dropped.
pub struct FakeDetailsService {
    pub base_url: String,
    state: Arc<DetailsState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl FakeDetailsService {
    pub async fn spawn(behavior: DetailsBehavior) -> Self {
        let state = Arc::new(DetailsState {
            behavior,
            requests: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        });
        let app = Router::new()
            .route("/info", get(info))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake details service");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake details service failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Number of `/info` requests received so far
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// `(group, song)` of the most recent `/info` request
    pub fn last_query(&self) -> Option<(String, String)> {
        self.state.last_query.lock().unwrap().clone()
    }
}

impl Drop for FakeDetailsService {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
