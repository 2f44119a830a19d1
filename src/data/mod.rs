//! Core data models for weatherdash
//!
//! This module contains the types shared by the API clients, the forecast
//! windowing logic and the renderer: coordinates, geocoded places and the
//! immutable forecast snapshot returned by a single fetch.

pub mod geocoding;
pub mod weather;

pub use geocoding::{GeocodingClient, GeocodingError};
pub use weather::{WeatherClient, WeatherError};

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::units::Units;

/// Timeout applied to every outbound request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Nominatim rejects requests without an identifying User-Agent
const USER_AGENT: &str = concat!("weatherdash/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by the weather and geocoding clients.
///
/// Falls back to a default client if the configured builder fails, so the
/// clients themselves stay infallible to construct.
pub fn http_client() -> Client {
    match Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to build configured HTTP client, using defaults: {}", e);
            Client::new()
        }
    }
}

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// What the dashboard is showing: a searched city or a raw position
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// A city name, resolved through geocoding on every fetch
    City(String),
    /// Coordinates from geolocation or a picked suggestion
    Coordinates(Coordinates),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::City(name) => write!(f, "{}", name),
            Location::Coordinates(coords) => write!(f, "{}", coords),
        }
    }
}

/// A geocoding match for a searched city name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// City name as returned by the geocoder
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// First-level administrative area (state, province, region)
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Name shown in the dashboard header
    pub fn place_name(&self) -> PlaceName {
        PlaceName {
            name: self.name.clone(),
            country: self.country.clone().unwrap_or_default(),
        }
    }

    /// Label shown in the search suggestion dropdown ("Paris, Île-de-France, France")
    pub fn suggestion_label(&self) -> String {
        [Some(self.name.as_str()), self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Human-readable name of a location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceName {
    pub name: String,
    pub country: String,
}

impl PlaceName {
    /// Label used when a position could not be reverse geocoded
    pub fn current_location() -> Self {
        Self {
            name: "Current Location".to_string(),
            country: String::new(),
        }
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.country.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}, {}", self.name, self.country)
        }
    }
}

/// Conditions at the time of the fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Observation time in the location's local time
    pub time: NaiveDateTime,
    pub temperature: f64,
    /// Apparent ("feels like") temperature
    pub feels_like: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    pub precipitation: f64,
    pub wind_speed: f64,
    /// WMO weather code
    pub weather_code: u8,
}

/// Forecast for a single hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Start of the hour in the location's local time
    pub time: NaiveDateTime,
    pub temperature: f64,
    /// WMO weather code
    pub weather_code: u8,
}

/// Forecast summary for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// WMO weather code
    pub weather_code: u8,
    pub temperature_max: f64,
    pub temperature_min: f64,
}

/// One fetched forecast response
///
/// Snapshots are never merged: every refresh replaces the previous one. The
/// units the request was made with travel along so the renderer always labels
/// values with the units the API actually returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
    /// Units the values are expressed in
    pub units: Units,
    /// Offset of the location's timezone from UTC
    pub utc_offset_seconds: i32,
    /// When this data was fetched
    pub fetched_at: DateTime<Utc>,
}

impl ForecastSnapshot {
    /// Converts an instant into the location's local wall-clock time
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        FixedOffset::east_opt(self.utc_offset_seconds)
            .map(|offset| instant.with_timezone(&offset).naive_local())
            .unwrap_or_else(|| instant.naive_utc())
    }
}
