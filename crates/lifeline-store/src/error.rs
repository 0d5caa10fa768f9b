//! Error types for the storage layer.
//!
//! All errors are propagated via [`StoreError`]. Backend-specific failures
//! (network, protocol, a switched-off in-memory store) are folded into
//! [`StoreError::Unavailable`] so callers can tell "the store could not be
//! reached" apart from "the log is empty", which is never an error.

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The persistence backend could not be reached or refused the call.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored blob could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration error (bad URL, bad retention value).
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Whether this error means the backend was unreachable.
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<fred::error::Error> for StoreError {
    fn from(err: fred::error::Error) -> Self {
        Self::Unavailable(format!("Dragonfly error: {err}"))
    }
}
