//! HTTP handlers of the song library and the mapping of workflow outcomes to
//! responses.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::state::{GuardedSongLibrary, ServerState};
use crate::library::{AddSongOutcome, LibraryError, ListSongsParams};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct EmptyBody {}

#[derive(Serialize)]
struct AddedSong {
    id: i32,
}

/// Body of `POST /library/add`. `group`/`song` are accepted as aliases.
#[derive(Deserialize, Debug)]
struct AddSongBody {
    #[serde(default, alias = "group")]
    artist: String,
    #[serde(default, alias = "song")]
    title: String,
}

#[derive(Deserialize, Debug)]
struct UpdateSongBody {
    #[serde(default)]
    id: i32,
    #[serde(rename = "releaseDate")]
    release_date: Option<String>,
    text: Option<String>,
    link: Option<String>,
}

#[derive(Deserialize, Debug)]
struct DeleteSongParams {
    id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CoupletParams {
    id: Option<String>,
    page: Option<String>,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

fn invalid_request(rejection: JsonRejection) -> Response {
    debug!("Rejected request body: {}", rejection.body_text());
    error_response(StatusCode::BAD_REQUEST, "invalid request".to_string())
}

fn without_details_message(id: i32) -> String {
    format!(
        "Song ID: {}\n\
         Unable to get additional information about the song.\n\
         There is no data or the server is unavailable.\n\
         The song will be added to the database without additional information.",
        id
    )
}

impl IntoResponse for LibraryError {
    fn into_response(self) -> Response {
        match self {
            LibraryError::Validation(message) | LibraryError::Conflict(message) => {
                debug!("Rejected library request: {}", message);
                error_response(StatusCode::BAD_REQUEST, message)
            }
            LibraryError::Storage(err) => {
                error!("Library storage failure: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

async fn add_song(
    State(library): State<GuardedSongLibrary>,
    body: Result<Json<AddSongBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_request(rejection),
    };

    match library.add_song(&body.artist, &body.title).await {
        Ok(AddSongOutcome::Enriched { id }) => {
            (StatusCode::CREATED, Json(AddedSong { id })).into_response()
        }
        Ok(AddSongOutcome::WithoutDetails { id }) => {
            (StatusCode::OK, without_details_message(id)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn delete_song(
    State(library): State<GuardedSongLibrary>,
    Query(params): Query<DeleteSongParams>,
) -> Response {
    match library.delete_song(params.id.as_deref().unwrap_or_default()) {
        Ok(()) => Json(EmptyBody {}).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn update_song(
    State(library): State<GuardedSongLibrary>,
    body: Result<Json<UpdateSongBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_request(rejection),
    };

    match library.update_song(body.id, body.release_date, body.text, body.link) {
        Ok(()) => Json(EmptyBody {}).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn list_songs(
    State(library): State<GuardedSongLibrary>,
    Query(params): Query<ListSongsParams>,
) -> Response {
    match library.list_songs(params) {
        Ok(songs) => Json(songs).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_couplet(
    State(library): State<GuardedSongLibrary>,
    Query(params): Query<CoupletParams>,
) -> Response {
    match library.get_couplet(
        params.id.as_deref().unwrap_or_default(),
        params.page.as_deref().unwrap_or_default(),
    ) {
        Ok(couplet) => couplet.into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_library_routes(state: ServerState) -> Router {
    Router::new()
        .route("/library/add", post(add_song))
        .route("/library/delete", delete(delete_song))
        .route("/library/update", put(update_song))
        .route("/library/list", get(list_songs))
        .route("/song/couplet", get(get_couplet))
        .with_state(state)
}
