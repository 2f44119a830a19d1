//! Command-line interface parsing for weatherdash
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated [`StartupConfig`]: the initial city or coordinates, the unit
//! selection, and the API endpoints.

use clap::Parser;
use thiserror::Error;

use crate::data::geocoding::{GEOCODING_BASE_URL, REVERSE_GEOCODING_BASE_URL};
use crate::data::weather::OPEN_METEO_BASE_URL;
use crate::data::Coordinates;
use crate::units::{PrecipitationUnit, TemperatureUnit, UnitSystem, Units, WindSpeedUnit};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// Only one of --lat / --lon was given
    #[error("Invalid coordinates: --lat and --lon must be given together")]
    IncompleteCoordinates,

    #[error("Invalid latitude: {0} (expected -90 to 90)")]
    LatitudeOutOfRange(f64),

    #[error("Invalid longitude: {0} (expected -180 to 180)")]
    LongitudeOutOfRange(f64),

    #[error("Invalid city: the name is empty")]
    EmptyCity,
}

/// weatherdash - current, hourly and 7-day forecasts in your terminal
#[derive(Parser, Debug)]
#[command(name = "weatherdash")]
#[command(about = "Terminal weather dashboard powered by Open-Meteo")]
#[command(version)]
pub struct Cli {
    /// Open with the forecast for this city
    ///
    /// Examples:
    ///   weatherdash --city Paris
    ///   weatherdash --city "New York" --imperial
    #[arg(long, value_name = "NAME", conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude reported as the current position (requires --lon)
    #[arg(long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude reported as the current position (requires --lat)
    #[arg(long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Start with imperial units (°F, mph, inches)
    #[arg(long)]
    pub imperial: bool,

    /// Temperature unit label, e.g. "celsius", "°F"
    #[arg(long, value_name = "UNIT")]
    pub temperature: Option<String>,

    /// Wind speed unit label, e.g. "km/h", "mph"
    #[arg(long, value_name = "UNIT")]
    pub wind_speed: Option<String>,

    /// Precipitation unit label, e.g. "mm", "inch"
    #[arg(long, value_name = "UNIT")]
    pub precipitation: Option<String>,

    /// Forecast API endpoint
    #[arg(long, value_name = "URL", env = "WEATHERDASH_FORECAST_URL", default_value = OPEN_METEO_BASE_URL)]
    pub forecast_url: String,

    /// Geocoding (city search) API endpoint
    #[arg(long, value_name = "URL", env = "WEATHERDASH_GEOCODING_URL", default_value = GEOCODING_BASE_URL)]
    pub geocoding_url: String,

    /// Reverse geocoding API endpoint
    #[arg(
        long,
        value_name = "URL",
        env = "WEATHERDASH_REVERSE_GEOCODING_URL",
        default_value = REVERSE_GEOCODING_BASE_URL
    )]
    pub reverse_geocoding_url: String,
}

/// API endpoints the clients talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub forecast: String,
    pub geocoding: String,
    pub reverse_geocoding: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            forecast: OPEN_METEO_BASE_URL.to_string(),
            geocoding: GEOCODING_BASE_URL.to_string(),
            reverse_geocoding: REVERSE_GEOCODING_BASE_URL.to_string(),
        }
    }
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartupConfig {
    /// City to search for on startup
    pub city: Option<String>,
    /// Coordinates the position source reports
    pub position: Option<Coordinates>,
    /// Initial unit selection
    pub units: Units,
    /// Initial unit system (drives the "switch units" label)
    pub unit_system: UnitSystem,
    pub endpoints: Endpoints,
}

/// Validates a --lat / --lon pair.
///
/// # Returns
/// * `Ok(None)` if neither was given
/// * `Ok(Some(Coordinates))` if both were given and are in range
/// * `Err(CliError)` otherwise
pub fn parse_coordinates(lat: Option<f64>, lon: Option<f64>) -> Result<Option<Coordinates>, CliError> {
    match (lat, lon) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(CliError::LatitudeOutOfRange(lat));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(CliError::LongitudeOutOfRange(lon));
            }
            Ok(Some(Coordinates::new(lat, lon)))
        }
        _ => Err(CliError::IncompleteCoordinates),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// Unit labels are normalized the same way as menu selections; any label
    /// given explicitly overrides the preset chosen by --imperial.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let city = match cli.city.as_deref().map(str::trim) {
            Some("") => return Err(CliError::EmptyCity),
            Some(name) => Some(name.to_string()),
            None => None,
        };

        let position = parse_coordinates(cli.lat, cli.lon)?;

        let unit_system = if cli.imperial {
            UnitSystem::Imperial
        } else {
            UnitSystem::Metric
        };

        let mut units = unit_system.units();
        if let Some(label) = &cli.temperature {
            units.temperature = TemperatureUnit::from_label(label);
        }
        if let Some(label) = &cli.wind_speed {
            units.wind_speed = WindSpeedUnit::from_label(label);
        }
        if let Some(label) = &cli.precipitation {
            units.precipitation = PrecipitationUnit::from_label(label);
        }

        Ok(StartupConfig {
            city,
            position,
            units,
            unit_system,
            endpoints: Endpoints {
                forecast: cli.forecast_url.clone(),
                geocoding: cli.geocoding_url.clone(),
                reverse_geocoding: cli.reverse_geocoding_url.clone(),
            },
        })
    }
}
