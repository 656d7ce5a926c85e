use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pinsync_application::SyncUseCase;
use pinsync_core::Store;
use pinsync_infrastructure::{
    ConfigService, FileCredentialStore, JsonFileTabSource, PinboardGateway,
};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "pinsync")]
#[command(about = "Sync open browser tabs with Pinboard bookmarks", long_about = None)]
struct Cli {
    /// JSON snapshot of the open tabs
    #[arg(long, global = true, default_value = "tabs.json")]
    tabs: PathBuf,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output from pinsync
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and store a Pinboard API token (`user:HEX`)
    Login { token: String },
    /// Forget the stored token
    Logout,
    /// Show whether a URL (or every open tab) is bookmarked
    Status { url: Option<String> },
    /// Show tag suggestions for the active tab
    Suggest,
    /// Bookmark the active tab
    Save {
        /// Space-separated tags; defaults to the saved or suggested tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Bookmark every open tab that is not saved yet
    SaveAll,
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "pinsync=debug" } else { "pinsync=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = config_service.get_config()?;
    tracing::debug!("[pinsync] Using {}", config.api_base_url);

    let api = Arc::new(PinboardGateway::from_config(&config)?);
    let tab_source = Arc::new(JsonFileTabSource::new(&cli.tabs));
    let credential_store = Arc::new(FileCredentialStore::new()?);

    let store = Store::default();
    let subscription = render::watch(&store);

    let outcome = store
        .run(|store| async move {
            let usecase = SyncUseCase::new(store, api, tab_source, credential_store);
            commands::execute(&usecase, cli.command).await
        })
        .await;

    subscription.unsubscribe();
    outcome
}
