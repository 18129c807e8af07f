use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use snus_core::Coordinates;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable: {0}")]
    Unavailable(String),
    #[error("location request timed out")]
    Timeout,
}

/// Source of the device position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    fn has_authorization(&self) -> bool;

    /// Asks the user for permission. The answer arrives out of band and is
    /// observed through later `has_authorization` calls.
    fn request_authorization(&self);

    async fn current_location(&self) -> Result<Coordinates, LocationError>;
}

/// Fetches one reading, bounded by `timeout`.
pub async fn fetch_location(
    provider: &dyn LocationProvider,
    timeout: Duration,
) -> Result<Coordinates, LocationError> {
    if !provider.has_authorization() {
        return Err(LocationError::PermissionDenied);
    }
    match tokio::time::timeout(timeout, provider.current_location()).await {
        Ok(result) => result,
        Err(_) => Err(LocationError::Timeout),
    }
}

/// Always reports the same position.
#[derive(Debug)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    fn has_authorization(&self) -> bool {
        true
    }

    fn request_authorization(&self) {}

    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        debug!(
            latitude = self.coordinates.latitude,
            longitude = self.coordinates.longitude,
            "fixed location"
        );
        Ok(self.coordinates)
    }
}

/// A device without a usable location service. Authorization is never granted.
#[derive(Debug, Default)]
pub struct NoLocation {
    requested: AtomicBool,
}

impl NoLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for NoLocation {
    fn has_authorization(&self) -> bool {
        false
    }

    fn request_authorization(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            info!("location permission requested; no location service available");
        }
    }

    async fn current_location(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::PermissionDenied)
    }
}
