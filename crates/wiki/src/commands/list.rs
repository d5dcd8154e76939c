//! `wiki list` command implementation.

use std::path::PathBuf;

use clap::Args;
use wiki_config::{CliSettings, Config};
use wiki_server::{open_store, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Path to configuration file (default: auto-discover wiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config).
    #[arg(short, long, env = "WIKI_DATABASE")]
    database: Option<PathBuf>,

    /// Collection holding the pages (overrides config).
    #[arg(long)]
    collection: Option<String>,
}

impl ListArgs {
    /// Execute the list command.
    ///
    /// Titles are printed to stdout one per line, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the store cannot be read.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            database: self.database,
            collection: self.collection,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let store = open_store(&server_config_from_config(&config, false)).await?;
        let mut titles = store.list().await?;
        titles.sort_unstable();

        if titles.is_empty() {
            output.info("No pages");
        }
        for title in &titles {
            output.result(title);
        }

        Ok(())
    }
}
