use thiserror::Error;

/// Errors raised while constructing a [`crate::DistanceMatrixClient`].
///
/// Request-time failures use [`servicearea_core::DistanceError`] instead.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid distance API URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
