//! Response types of the external song details service.

use serde::Deserialize;

/// Body of a successful `GET /info` response.
///
/// The release date is kept as the raw string the service sent; the library
/// decides whether it is usable.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SongDetails {
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub text: String,
    pub link: String,
}
