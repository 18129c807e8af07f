use snus_core::{Settings, TimeWindow};
use snus_db::Db;
use tracing::info;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db};

/// Durable user preferences. Every call reads or writes the database directly,
/// so a read always observes the latest write.
#[derive(Clone)]
pub struct SettingsService {
    config: SharedConfig,
}

impl SettingsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn get(&self) -> Result<Settings> {
        Ok(self.db()?.load_settings()?)
    }

    pub fn cost_per_package(&self) -> Result<f64> {
        Ok(self.db()?.get_cost_per_package()?)
    }

    pub fn units_per_package(&self) -> Result<f64> {
        Ok(self.db()?.get_portions_per_package()?)
    }

    pub fn display_window(&self) -> Result<TimeWindow> {
        Ok(self.db()?.get_home_screen_period()?)
    }

    pub fn dark_mode(&self) -> Result<bool> {
        Ok(self.db()?.get_dark_mode()?)
    }

    pub fn set_cost_per_package(&self, cost: f64) -> Result<()> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "cost per package must be zero or more, got {}",
                cost
            )));
        }
        self.db()?.set_cost_per_package(cost)?;
        info!(cost, "cost per package updated");
        Ok(())
    }

    pub fn set_units_per_package(&self, units: f64) -> Result<()> {
        if !units.is_finite() || units <= 0.0 {
            return Err(AppError::InvalidConfiguration(format!(
                "units per package must be positive, got {}",
                units
            )));
        }
        self.db()?.set_portions_per_package(units)?;
        info!(units, "units per package updated");
        Ok(())
    }

    pub fn set_display_window(&self, window: TimeWindow) -> Result<()> {
        self.db()?.set_home_screen_period(window)?;
        info!(window = %window, "display window updated");
        Ok(())
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.db()?.set_dark_mode(enabled)?;
        info!(enabled, "dark mode updated");
        Ok(())
    }
}
