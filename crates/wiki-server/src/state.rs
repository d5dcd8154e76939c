//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use wiki_storage::PageStore;

use crate::templates::Templates;

/// Application state shared across all handlers.
///
/// Built once at startup and read-only afterwards.
pub(crate) struct AppState {
    /// Page store backend.
    pub(crate) store: Arc<dyn PageStore>,
    /// Compiled page templates.
    pub(crate) templates: Templates,
}

impl AppState {
    /// Create state around a store, loading the embedded templates.
    pub(crate) fn new(store: Arc<dyn PageStore>) -> Result<Self, minijinja::Error> {
        Ok(Self {
            store,
            templates: Templates::new()?,
        })
    }
}
