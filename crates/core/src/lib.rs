use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod markers;
pub mod stats;
pub mod window;

pub use markers::{ClusterSummary, DEFAULT_MARKER_JITTER, MapMarker, markers_for, markers_in};
pub use stats::{
    Projection, WindowStats, count_in, estimate_cost, filter_window, packages_used,
    window_stats, windowed_average,
};
pub use window::WindowBounds;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

pub const DEFAULT_COST_PER_PACKAGE: f64 = 30.0;
pub const DEFAULT_UNITS_PER_PACKAGE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Stands in for "no location available".
    pub const SENTINEL: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// One logged consumption instance.
///
/// `id` is `0` until the store assigns one. The timestamp is fixed at
/// creation and expressed in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub timestamp: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl Entry {
    pub fn new(timestamp: i64) -> Self {
        Self {
            id: 0,
            timestamp,
            latitude: Coordinates::SENTINEL.latitude,
            longitude: Coordinates::SENTINEL.longitude,
        }
    }

    pub fn now() -> Self {
        Self::new(Utc::now().timestamp_millis())
    }

    pub fn with_location(self, coordinates: Coordinates) -> Self {
        Self {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            ..self
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Total,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 5] = [
        TimeWindow::Daily,
        TimeWindow::Weekly,
        TimeWindow::Monthly,
        TimeWindow::Yearly,
        TimeWindow::Total,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Daily => "Daily",
            TimeWindow::Weekly => "Weekly",
            TimeWindow::Monthly => "Monthly",
            TimeWindow::Yearly => "Yearly",
            TimeWindow::Total => "Total",
        }
    }

    /// Number of days a projection is scaled to. `Total` has no projection.
    pub fn projection_days(&self) -> Option<u32> {
        match self {
            TimeWindow::Daily => Some(1),
            TimeWindow::Weekly => Some(7),
            TimeWindow::Monthly => Some(30),
            TimeWindow::Yearly => Some(365),
            TimeWindow::Total => None,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time window {0}")]
pub struct ParseWindowError(pub String);

impl FromStr for TimeWindow {
    type Err = ParseWindowError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = value.trim();
        TimeWindow::ALL
            .into_iter()
            .find(|window| window.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseWindowError(trimmed.to_string()))
    }
}

/// User preferences. Exactly one record exists per installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub cost_per_package: f64,
    pub units_per_package: f64,
    pub display_window: TimeWindow,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cost_per_package: DEFAULT_COST_PER_PACKAGE,
            units_per_package: DEFAULT_UNITS_PER_PACKAGE,
            display_window: TimeWindow::Daily,
            dark_mode: false,
        }
    }
}
