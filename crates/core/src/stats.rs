use serde::{Deserialize, Serialize};

use crate::window::WindowBounds;
use crate::{CoreError, Entry, MILLIS_PER_DAY, Result, Settings, TimeWindow};

/// Count for a full window, either observed or extrapolated from the daily rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub is_actual: bool,
    pub projected_count: f64,
}

impl Projection {
    pub fn actual(count: f64) -> Self {
        Self {
            is_actual: true,
            projected_count: count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub window: TimeWindow,
    pub total: u64,
    pub projection: Projection,
    pub packages: f64,
    pub cost: f64,
}

impl WindowStats {
    pub fn empty(window: TimeWindow) -> Self {
        Self {
            window,
            total: 0,
            projection: Projection::actual(0.0),
            packages: 0.0,
            cost: 0.0,
        }
    }
}

/// Scales the observed daily rate of `entries` to `window_days`.
///
/// The observed span is the inclusive number of days between the first and
/// last entry. The result is actual once that span covers the window.
pub fn windowed_average(entries: &[Entry], window_days: u32) -> Projection {
    let Some(first) = entries.iter().map(|entry| entry.timestamp).min() else {
        return Projection::actual(0.0);
    };
    let last = entries
        .iter()
        .map(|entry| entry.timestamp)
        .max()
        .unwrap_or(first);
    let days_logged = last.abs_diff(first) / MILLIS_PER_DAY.unsigned_abs() + 1;
    let average_per_day = entries.len() as f64 / days_logged as f64;
    Projection {
        is_actual: days_logged >= u64::from(window_days),
        projected_count: average_per_day * f64::from(window_days),
    }
}

pub fn packages_used(projected_count: f64, units_per_package: f64) -> Result<f64> {
    if !units_per_package.is_finite() || units_per_package <= 0.0 {
        return Err(CoreError::InvalidConfiguration(format!(
            "units per package must be positive, got {}",
            units_per_package
        )));
    }
    Ok(projected_count / units_per_package)
}

pub fn estimate_cost(
    projected_count: f64,
    units_per_package: f64,
    cost_per_package: f64,
) -> Result<f64> {
    Ok(packages_used(projected_count, units_per_package)? * cost_per_package)
}

pub fn filter_window(entries: &[Entry], bounds: &WindowBounds) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| bounds.contains(entry.timestamp))
        .copied()
        .collect()
}

pub fn count_in(entries: &[Entry], bounds: &WindowBounds) -> u64 {
    entries
        .iter()
        .filter(|entry| bounds.contains(entry.timestamp))
        .count() as u64
}

/// Totals, projection and cost for entries already restricted to `window`.
pub fn window_stats(
    window: TimeWindow,
    entries: &[Entry],
    settings: &Settings,
) -> Result<WindowStats> {
    let total = entries.len() as u64;
    let projection = match window.projection_days() {
        Some(days) => windowed_average(entries, days),
        None => Projection::actual(total as f64),
    };
    let packages = packages_used(projection.projected_count, settings.units_per_package)?;
    let cost = estimate_cost(
        projection.projected_count,
        settings.units_per_package,
        settings.cost_per_package,
    )?;
    Ok(WindowStats {
        window,
        total,
        projection,
        packages,
        cost,
    })
}
