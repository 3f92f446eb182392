//! Device location.
//!
//! A terminal has no browser geolocation, so providers are pluggable: the
//! binary uses a configured home position and tests use fixed values.

use std::future::Future;
use std::time::Duration;

pub use skycast_core::LocationError;

/// Geographic position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
}

pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> impl Future<Output = Result<Location, LocationError>> + Send;
}

/// Always reports the same position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Location);

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Location {
            latitude,
            longitude,
            accuracy_meters: None,
        })
    }
}

impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        Ok(self.0)
    }
}

/// No location source available
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationProvider for NoLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// Ask `provider` for a position, giving up after `timeout`
pub async fn locate_with_timeout<P: LocationProvider>(
    provider: &P,
    timeout: Duration,
) -> Result<Location, LocationError> {
    match tokio::time::timeout(timeout, provider.current_location()).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Location request timed out after {:?}", timeout);
            Err(LocationError::Timeout)
        }
    }
}
