//! Error types for the request API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lifeline_core::ResolverError;
use lifeline_store::StoreError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request is malformed or inconsistent with its path.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body failed field validation.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The resolver rejected or could not complete the request.
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// A direct store read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Resolver(e) => match e {
                ResolverError::PermissionDenied => StatusCode::FORBIDDEN,
                ResolverError::PositionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ResolverError::NoFacilitiesConfigured => StatusCode::CONFLICT,
                ResolverError::UnknownFacility(_) => StatusCode::NOT_FOUND,
                ResolverError::Store(store) => store_status(store),
                ResolverError::Precondition(_) => StatusCode::BAD_REQUEST,
            },
            Self::Store(e) => store_status(e),
        }
    }
}

fn store_status(error: &StoreError) -> StatusCode {
    if error.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
