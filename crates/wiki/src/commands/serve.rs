//! `wiki serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use wiki_config::{CliSettings, Config};
use wiki_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover wiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "WIKI_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "WIKI_PORT")]
    port: Option<u16>,

    /// SQLite database file (overrides config).
    #[arg(short, long, env = "WIKI_DATABASE")]
    database: Option<PathBuf>,

    /// Collection holding the pages (overrides config).
    #[arg(long)]
    collection: Option<String>,

    /// Keep pages in memory; nothing is persisted.
    #[arg(long, conflicts_with = "database")]
    in_memory: bool,

    /// Enable verbose output (request and storage logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the store cannot be opened,
    /// or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            database: self.database,
            collection: self.collection,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        if self.in_memory {
            output.info("Storage: in-memory (pages are not persisted)");
        } else {
            output.info(&format!(
                "Database: {} (collection: {})",
                config.storage_resolved.database.display(),
                config.storage_resolved.collection
            ));
        }
        output.highlight(&format!(
            "Open http://{}:{}/list",
            config.server.host, config.server.port
        ));

        let server_config = server_config_from_config(&config, self.in_memory);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
