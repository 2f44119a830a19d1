//! Device position lookup
//!
//! A [`PositionSource`] yields the coordinates the dashboard opens with. The
//! terminal build has no location service of its own, so it ships
//! [`FixedPosition`], fed from the `--lat/--lon` flags.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::data::Coordinates;

/// Options passed to every position lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask the source for its most precise fix
    pub enable_high_accuracy: bool,
    /// Give up after this long
    pub timeout: Duration,
    /// Oldest cached fix the caller accepts; zero demands a fix taken during
    /// this lookup, so the source must not replay a cached one
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(5),
            maximum_age: Duration::ZERO,
        }
    }
}

/// A position fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coords: Coordinates,
    /// Accuracy radius in meters, if the source knows it
    pub accuracy_meters: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Errors that can occur when looking up the device position
#[derive(Debug, Error)]
pub enum GeolocationError {
    /// The source has no position to offer
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// The source did not answer within the configured timeout
    #[error("Position lookup timed out after {0:?}")]
    Timeout(Duration),

    /// The cached fix is older than the caller accepts
    #[error("Position is {0:?} old, older than allowed")]
    Stale(Duration),
}

/// Something that can report where the user is
pub trait PositionSource {
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Position, GeolocationError>> + Send;
}

/// A source that always reports the coordinates it was built with
///
/// Every answer is stamped at lookup time, so it is never a cached fix and
/// satisfies any `maximum_age`.
#[derive(Debug, Clone, Default)]
pub struct FixedPosition {
    coords: Option<Coordinates>,
}

impl FixedPosition {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

impl PositionSource for FixedPosition {
    fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> impl Future<Output = Result<Position, GeolocationError>> + Send {
        let coords = self.coords;
        async move {
            let coords = coords.ok_or_else(|| {
                GeolocationError::Unavailable("no coordinates configured (use --lat/--lon)".to_string())
            })?;

            Ok(Position {
                coords,
                accuracy_meters: None,
                timestamp: Utc::now(),
            })
        }
    }
}

/// Looks up the current position, enforcing the timeout and maximum age in
/// `options`.
pub async fn locate<S: PositionSource>(
    source: &S,
    options: &PositionOptions,
) -> Result<Position, GeolocationError> {
    let requested_at = Utc::now();
    let position = tokio::time::timeout(options.timeout, source.current_position(options))
        .await
        .map_err(|_| GeolocationError::Timeout(options.timeout))??;

    // A fix stamped before the lookup began is a cached one
    if position.timestamp < requested_at {
        let age = (requested_at - position.timestamp)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if age > options.maximum_age {
            return Err(GeolocationError::Stale(age));
        }
    }

    tracing::debug!(coords = %position.coords, "Position acquired");
    Ok(position)
}
