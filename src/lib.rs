//! Song Library Server Library
//!
//! This library exposes the internal modules for testing and for the server
//! binary.

pub mod config;
pub mod library;
pub mod library_store;
pub mod release_date;
pub mod server;
pub mod song_details;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use library::{LibraryError, SongLibrary};
pub use library_store::{LibraryStore, SqliteLibraryStore};
pub use server::{run_server, RequestsLoggingLevel};
pub use song_details::{HttpSongDetailsClient, NoOpSongDetailsProvider, SongDetailsProvider};
