//! Dashboard loading
//!
//! Composes the geocoding and forecast clients into the single load
//! operation behind every refresh.

use thiserror::Error;

use crate::cli::Endpoints;
use crate::data::{
    http_client, Coordinates, ForecastSnapshot, GeocodingClient, GeocodingError, Location, Place,
    PlaceName, WeatherClient, WeatherError,
};
use crate::units::Units;

/// Everything the dashboard paints after a successful load
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub place: PlaceName,
    pub snapshot: ForecastSnapshot,
}

/// The two failure kinds the user gets to see; everything else is logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Server,
    Other,
}

/// Errors that can occur while loading a dashboard
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Geocoding(#[from] GeocodingError),
}

impl LoadError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LoadError::Weather(WeatherError::ServerError)
            | LoadError::Geocoding(GeocodingError::ServerError) => FailureKind::Server,
            LoadError::Geocoding(GeocodingError::NotFound(_)) => FailureKind::NotFound,
            _ => FailureKind::Other,
        }
    }
}

/// Loads forecasts and place names for a location
#[derive(Debug, Clone, Default)]
pub struct WeatherService {
    weather: WeatherClient,
    geocoding: GeocodingClient,
}

impl WeatherService {
    pub fn new(weather: WeatherClient, geocoding: GeocodingClient) -> Self {
        Self { weather, geocoding }
    }

    /// Builds both clients against the configured endpoints, sharing one HTTP client
    pub fn from_endpoints(endpoints: &Endpoints) -> Self {
        let client = http_client();
        Self {
            weather: WeatherClient::with_client(client.clone(), endpoints.forecast.clone()),
            geocoding: GeocodingClient::with_client(
                client,
                endpoints.geocoding.clone(),
                endpoints.reverse_geocoding.clone(),
            ),
        }
    }

    /// Fetches the forecast for a location in the given units.
    ///
    /// Cities are geocoded first and named after the geocoding match.
    /// Coordinates are forecast first and then reverse geocoded; if that
    /// lookup fails for any reason other than a server error, the place is
    /// labelled "Current Location".
    pub async fn load(&self, location: &Location, units: &Units) -> Result<Dashboard, LoadError> {
        match location {
            Location::City(name) => {
                let place = self.geocoding.resolve_city(name).await?;
                let snapshot = self.weather.fetch_forecast(place.coordinates(), units).await?;
                Ok(Dashboard {
                    place: place.place_name(),
                    snapshot,
                })
            }
            Location::Coordinates(coords) => {
                let snapshot = self.weather.fetch_forecast(*coords, units).await?;
                let place = self.name_position(*coords).await?;
                Ok(Dashboard { place, snapshot })
            }
        }
    }

    /// Search dropdown suggestions for a partially typed city name
    pub async fn suggest(&self, query: &str) -> Result<Vec<Place>, LoadError> {
        Ok(self.geocoding.suggest_cities(query).await?)
    }

    async fn name_position(&self, coords: Coordinates) -> Result<PlaceName, LoadError> {
        match self.geocoding.reverse_geocode(coords).await {
            Ok(place) => Ok(place),
            Err(GeocodingError::ServerError) => Err(GeocodingError::ServerError.into()),
            Err(e) => {
                tracing::warn!("Reverse geocoding {} failed: {}", coords, e);
                Ok(PlaceName::current_location())
            }
        }
    }
}
