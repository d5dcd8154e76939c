//! HTTP server for the wiki.
//!
//! This crate provides the wiki's HTTP surface using axum:
//! - `GET /view/{title}` renders a page, or redirects to its edit form
//! - `GET /edit/{title}` renders the edit form (blank for new pages)
//! - `POST /save/{title}` upserts the page from the `body` form field
//! - `GET|POST /delete/{title}` removes the page
//! - `GET /list` renders the index of all titles
//!
//! Titles must match `^[a-zA-Z0-9]+$`; every other path is a 404.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use wiki_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 8080,
//!         database: PathBuf::from("wiki.db"),
//!         collection: "pages".to_owned(),
//!         in_memory: false,
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (wiki-server)
//!                        │
//!                        ├─► Title extractor (404 on invalid title)
//!                        │
//!                        ├─► Handler ──► PageStore (wiki-storage)
//!                        │
//!                        └─► minijinja templates / 302 redirect
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod templates;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use state::AppState;
use wiki_storage::{MemoryStore, PageStore, SqliteStore, StorageError};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// SQLite database file.
    pub database: PathBuf,
    /// Collection (table) holding the pages.
    pub collection: String,
    /// Keep pages in memory instead of the database.
    pub in_memory: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            database: PathBuf::from("wiki.db"),
            collection: "pages".to_owned(),
            in_memory: false,
        }
    }
}

/// Open the page store described by `config` and check it is reachable.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or does not answer.
pub async fn open_store(config: &ServerConfig) -> Result<Arc<dyn PageStore>, StorageError> {
    let store: Arc<dyn PageStore> = if config.in_memory {
        tracing::warn!("Using in-memory page store; pages are lost on shutdown");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(SqliteStore::open(&config.database, &config.collection).await?)
    };

    store.ping().await?;
    Ok(store)
}

/// Run the server.
///
/// Storage and templates are initialized before binding; any failure there
/// aborts startup without serving traffic.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&config).await?;
    let state = Arc::new(AppState::new(store)?);

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from wiki config.
///
/// # Arguments
///
/// * `config` - Wiki configuration
/// * `in_memory` - Keep pages in memory instead of the database
#[must_use]
pub fn server_config_from_config(config: &wiki_config::Config, in_memory: bool) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        database: config.storage_resolved.database.clone(),
        collection: config.storage_resolved.collection.clone(),
        in_memory,
    }
}
