//! Error taxonomy shared by the client, the store, and the view models.

/// Errors surfaced by the APOD client and the favorites store. View models
/// never propagate these; they convert them into a user-facing message and
/// drop out of their loading state.
#[derive(Debug, thiserror::Error)]
pub enum ApodError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to decode response: {0}")]
    Decoding(String),

    #[error("network error: {0}")]
    Transport(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("no data available")]
    NotFound,
}

impl From<rusqlite::Error> for ApodError {
    fn from(err: rusqlite::Error) -> Self {
        ApodError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApodError>;
