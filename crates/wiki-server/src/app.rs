//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Routes take a single path segment as the page title; anything else,
/// including titles with `/`, falls through to the 404 fallback.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/view/{title}", get(handlers::pages::view))
        .route("/edit/{title}", get(handlers::pages::edit))
        .route("/save/{title}", axum::routing::post(handlers::pages::save))
        .route(
            "/delete/{title}",
            get(handlers::pages::delete).post(handlers::pages::delete),
        )
        .route("/list", get(handlers::list::list))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
