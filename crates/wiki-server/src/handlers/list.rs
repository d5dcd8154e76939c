//! Page index.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use crate::error::ServerError;
use crate::handlers::found;
use crate::state::AppState;

/// Handle GET /list.
///
/// A storage failure redirects back to `/list`, so the browser retries
/// until the store recovers.
pub(crate) async fn list(State(state): State<Arc<AppState>>) -> Result<Response, ServerError> {
    match state.store.list().await {
        Ok(titles) => Ok(Html(state.templates.list(&titles)?).into_response()),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to list pages");
            Ok(found("/list"))
        }
    }
}
