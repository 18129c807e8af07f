mod entries;
mod error;
mod helpers;
mod migrations;
mod settings;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

pub use error::{DbError, Result};
pub use settings::{
    KEY_COST_PER_PACKAGE, KEY_DARK_MODE, KEY_HOME_SCREEN_PERIOD, KEY_PORTIONS_PER_PACKAGE,
};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the tracker database. Not shared across threads; open one per unit of work.
pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self { conn })
    }
}
