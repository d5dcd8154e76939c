//! HTTP request handlers.

pub(crate) mod list;
pub(crate) mod pages;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use wiki_storage::is_valid_title;

use crate::error::ServerError;

/// Page title taken from the last path segment.
///
/// Rejects with 404 before the handler runs when the segment is not a valid
/// title, so no storage operation happens for malformed paths.
pub(crate) struct Title(pub(crate) String);

impl<S: Send + Sync> FromRequestParts<S> for Title {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(title) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ServerError::NotFound)?;

        if !is_valid_title(&title) {
            tracing::debug!(path = %parts.uri.path(), "Rejected invalid page title");
            return Err(ServerError::NotFound);
        }

        Ok(Self(title))
    }
}

/// Respond with `302 Found` pointing at `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// Fallback for paths outside the wiki routes.
pub(crate) async fn not_found() -> ServerError {
    ServerError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_sets_location() {
        let response = found("/view/Foo");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/view/Foo");
    }
}
