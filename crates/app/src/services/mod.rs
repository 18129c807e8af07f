mod entries;
mod settings;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::{AppError, Result};
use snus_db::Db;

pub use entries::{EntryQuery, EventStore, Subscription};
pub use settings::SettingsService;

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub entries: EventStore,
    pub settings: SettingsService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            entries: EventStore::new(shared.clone()),
            settings: SettingsService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}

/// Runs `task` on the blocking pool so SQLite work never stalls async callers.
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| AppError::Task(err.to_string()))?
}
