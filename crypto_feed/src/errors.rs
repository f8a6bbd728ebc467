use thiserror::Error;

use crate::env::MissingEnvVarError;

/// Errors that abort a feed operation.
///
/// Only the catalog listing and client construction can fail this way;
/// per-symbol history problems are data, see
/// [`HistoryFetch`](crate::models::history::HistoryFetch).
#[derive(Debug, Error)]
pub enum FeedError {
    /// The catalog listing could not be retrieved (network failure, timeout).
    #[error("feed unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The feed answered, but not with a usable listing.
    #[error("feed unavailable: {0}")]
    BadResponse(String),

    /// The client could not be configured.
    #[error("feed configuration error: {0}")]
    Config(String),

    /// A required environment variable is missing.
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),
}

impl FeedError {
    /// True for the "feed unavailable" family (as opposed to local setup problems).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FeedError::Unavailable(_) | FeedError::BadResponse(_))
    }
}
