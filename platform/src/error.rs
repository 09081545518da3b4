//! Failures of document and blob operations.

/// Error returned by [`crate::DocumentStore`] and [`crate::BlobStore`].
///
/// Not retried; callers surface `Display` text to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{path} does not exist")]
    NotFound { path: String },
    #[error("you must be signed in to do that")]
    Unauthenticated,
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("service error {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}
