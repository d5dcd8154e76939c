//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use wiki_storage::StorageError;

/// Server error type.
///
/// Every variant terminates the request. Not-found pages are handled in the
/// handlers themselves (redirect or blank form) and never reach this type as
/// [`ServerError::Storage`].
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Path did not match any route or the title failed validation.
    #[error("404 page not found")]
    NotFound,

    /// Storage backend failed.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Template failed to render.
    #[error("{0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(e) => {
                tracing::error!(error = %e, "Storage operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Template(e) => {
                tracing::error!(error = %e, "Template rendering failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, format!("{self}\n")).into_response()
    }
}
