use thiserror::Error;

/// Failure classes of the library workflows.
///
/// `Validation` and `Conflict` are caused by the request and are reported to
/// the client. `Storage` covers everything the server is to blame for; its
/// details stay in the logs.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
