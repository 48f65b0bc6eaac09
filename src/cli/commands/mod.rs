//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific
//! modules.

mod documents;
mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use url::Url;

use crate::api::HttpApi;
use crate::config::{load_settings, Settings};

#[derive(Parser)]
#[command(name = "docscan")]
#[command(about = "Document collection synchronization client for DocScanner")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// User identifier (overrides config file)
    #[arg(short, long, global = true, env = "DOCSCAN_USER_ID")]
    user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// List documents, optionally scoped to one category
    List {
        /// Category to filter by
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// Search documents by text
    Search {
        /// Search query
        query: String,
    },

    /// Show categories with document counts
    Categories,

    /// Change a document's category
    SetCategory {
        /// Document ID
        id: String,
        /// New category name
        category: String,
    },

    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },

    /// Watch the collection live, polling while documents are processing
    Watch {
        /// Initial search text
        #[arg(short, long)]
        search: Option<String>,
        /// Initial category filter
        #[arg(short = 'C', long)]
        category: Option<String>,
    },
}

/// Build the HTTP API client from settings.
fn build_api(settings: &Settings) -> anyhow::Result<Arc<HttpApi>> {
    let base_url = Url::parse(&settings.server.base_url)
        .with_context(|| format!("invalid base URL: {}", settings.server.base_url))?;
    Ok(Arc::new(HttpApi::new(base_url, settings.timeout())))
}

/// Resolve the user identifier or fail with a hint.
fn require_user(settings: &Settings) -> anyhow::Result<&str> {
    settings.user_id.as_deref().context(
        "no user identifier configured; set user_id in the config file, \
         DOCSCAN_USER_ID, or pass --user",
    )
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(user) = cli.user {
        settings.user_id = Some(user);
    }

    let api = build_api(&settings)?;

    match cli.command {
        Commands::List { category } => {
            documents::cmd_list(&settings, api, category.as_deref()).await
        }
        Commands::Search { query } => documents::cmd_search(&settings, api, &query).await,
        Commands::Categories => documents::cmd_categories(&settings, api).await,
        Commands::SetCategory { id, category } => {
            documents::cmd_set_category(api, &id, &category).await
        }
        Commands::Delete { id } => documents::cmd_delete(api, &id).await,
        Commands::Watch { search, category } => {
            watch::cmd_watch(&settings, api, search, category).await
        }
    }
}
