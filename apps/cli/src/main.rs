mod args;
mod commands;
mod config;
mod paths;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use snus_app::{
    AppConfig, AppPaths, AppState, FixedLocation, LocationProvider, NoLocation,
    ensure_app_data_dir,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let loaded = config::load_or_create()?;
    if loaded.created {
        eprintln!("Created config at {}", loaded.file.display());
    }
    let config = loaded.config;

    let db_path = match cli.db.clone().or_else(|| config.db_path.clone()) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            path
        }
        None => {
            let paths = AppPaths::new(paths::resolve_data_dir()?);
            ensure_app_data_dir(&paths)?;
            paths.db_path
        }
    };
    debug!(path = %db_path.display(), "using database");

    let mut app_config = AppConfig::new(db_path);
    app_config.location_timeout = config.location_timeout();
    app_config.marker_jitter = config.marker_jitter;
    let app_state = AppState::new(app_config);
    app_state
        .initialize()
        .context("failed to initialize database")?;

    let location: Arc<dyn LocationProvider> = match config.location {
        Some(location) => Arc::new(FixedLocation::new(location.into())),
        None => Arc::new(NoLocation::new()),
    };
    let coordinator = app_state.coordinator(location);
    let listener = coordinator.start().await?;

    let result = commands::run(&coordinator, cli.command, cli.json).await;
    listener.abort();
    result
}
