use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use snus_core::DEFAULT_MARKER_JITTER;
use snus_db::Db;
use tracing::info;

use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::location::{DEFAULT_LOCATION_TIMEOUT, LocationProvider};
use crate::services::AppServices;

/// Paths and tunables needed to run the tracker.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub location_timeout: Duration,
    pub marker_jitter: f64,
}

impl AppConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            location_timeout: DEFAULT_LOCATION_TIMEOUT,
            marker_jitter: DEFAULT_MARKER_JITTER,
        }
    }
}

/// Application state shared by front ends.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn is_fresh_db(&self) -> bool {
        !self.config.db_path.exists()
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    pub fn initialize(&self) -> Result<()> {
        let is_fresh_db = self.is_fresh_db();
        self.setup_db()?;
        if is_fresh_db {
            info!(path = %self.config.db_path.display(), "created database");
        }
        Ok(())
    }

    pub fn coordinator(&self, location: Arc<dyn LocationProvider>) -> Coordinator {
        Coordinator::new(&self.services, location)
            .with_location_timeout(self.config.location_timeout)
            .with_marker_jitter(self.config.marker_jitter)
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
