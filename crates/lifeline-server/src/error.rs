//! Error types for the Lifeline server binary.
//!
//! [`ServerError`] wraps every failure mode during startup so `main` can
//! propagate with `?` and attach context.

/// Top-level startup error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lifeline_core::ConfigError,
    },

    /// The store backend could not be reached or configured.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: lifeline_store::StoreError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("api error: {source}")]
    Api {
        /// The underlying server error.
        #[from]
        source: lifeline_api::ServerError,
    },
}
