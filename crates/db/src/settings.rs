use std::str::FromStr;

use rusqlite::params;
use snus_core::{DEFAULT_COST_PER_PACKAGE, DEFAULT_UNITS_PER_PACKAGE, Settings, TimeWindow};
use tracing::warn;

use crate::Db;
use crate::error::Result;

pub const KEY_COST_PER_PACKAGE: &str = "cost_per_package";
pub const KEY_PORTIONS_PER_PACKAGE: &str = "portions_per_package";
pub const KEY_HOME_SCREEN_PERIOD: &str = "home_screen_period";
pub const KEY_DARK_MODE: &str = "dark_mode";

impl Db {
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_setting WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO app_setting (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn get_parsed<T: FromStr>(&self, key: &str, default: T) -> Result<T> {
        let Some(raw) = self.get_setting(key)? else {
            return Ok(default);
        };
        match raw.parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(key, value = %raw, "ignoring unparseable setting");
                Ok(default)
            }
        }
    }

    pub fn get_cost_per_package(&self) -> Result<f64> {
        self.get_parsed(KEY_COST_PER_PACKAGE, DEFAULT_COST_PER_PACKAGE)
    }

    pub fn set_cost_per_package(&self, cost: f64) -> Result<()> {
        self.set_setting(KEY_COST_PER_PACKAGE, &cost.to_string())
    }

    pub fn get_portions_per_package(&self) -> Result<f64> {
        self.get_parsed(KEY_PORTIONS_PER_PACKAGE, DEFAULT_UNITS_PER_PACKAGE)
    }

    pub fn set_portions_per_package(&self, portions: f64) -> Result<()> {
        self.set_setting(KEY_PORTIONS_PER_PACKAGE, &portions.to_string())
    }

    pub fn get_home_screen_period(&self) -> Result<TimeWindow> {
        self.get_parsed(KEY_HOME_SCREEN_PERIOD, TimeWindow::Daily)
    }

    pub fn set_home_screen_period(&self, window: TimeWindow) -> Result<()> {
        self.set_setting(KEY_HOME_SCREEN_PERIOD, window.as_str())
    }

    pub fn get_dark_mode(&self) -> Result<bool> {
        self.get_parsed(KEY_DARK_MODE, false)
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.set_setting(KEY_DARK_MODE, &enabled.to_string())
    }

    pub fn load_settings(&self) -> Result<Settings> {
        Ok(Settings {
            cost_per_package: self.get_cost_per_package()?,
            units_per_package: self.get_portions_per_package()?,
            display_window: self.get_home_screen_period()?,
            dark_mode: self.get_dark_mode()?,
        })
    }
}
