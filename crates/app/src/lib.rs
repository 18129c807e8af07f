pub mod app;
pub mod coordinator;
pub mod error;
pub mod location;
pub mod services;
pub mod startup;
pub mod util;

pub use app::{AppConfig, AppState};
pub use coordinator::{AppSnapshot, Coordinator, LocationRequest};
pub use error::{AppError, Result};
pub use location::{
    DEFAULT_LOCATION_TIMEOUT, FixedLocation, LocationError, LocationProvider, NoLocation,
    fetch_location,
};
pub use services::{AppServices, EntryQuery, EventStore, SettingsService, Subscription};
pub use startup::{AppPaths, DB_FILE_NAME, ensure_app_data_dir};
pub use util::time::{format_timestamp, format_timestamp_in, parse_window};
