//! Open-Meteo forecast API client
//!
//! This module fetches current conditions, hourly and daily forecasts from the
//! Open-Meteo API and parses them into a [`ForecastSnapshot`].

use chrono::{NaiveDate, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::{
    http_client, Coordinates, CurrentConditions, DailyForecast, ForecastSnapshot, HourlyForecast,
};
use crate::units::Units;

/// Base URL for the Open-Meteo forecast API
pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str =
    "temperature_2m,precipitation,wind_speed_10m,relative_humidity_2m,apparent_temperature,weather_code";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";

/// Errors that can occur when fetching forecast data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The forecast API answered with HTTP 500
    #[error("Forecast server error (HTTP 500)")]
    ServerError,

    /// Any other non-success status
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Invalid time format in response
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),
}

/// Client for fetching forecasts from the Open-Meteo API
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherClient {
    /// Create a new WeatherClient pointing at the public Open-Meteo API
    pub fn new() -> Self {
        Self::with_client(http_client(), OPEN_METEO_BASE_URL)
    }

    /// Create a new WeatherClient with a custom HTTP client and endpoint
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Create a new WeatherClient with a custom endpoint (mock servers, mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(http_client(), base_url)
    }

    /// Fetch current, hourly and daily forecasts for the given coordinates
    ///
    /// # Arguments
    /// * `coords` - Location to forecast
    /// * `units` - Units the API should return values in
    ///
    /// # Returns
    /// * `Ok(ForecastSnapshot)` - Parsed forecast, tagged with `units`
    /// * `Err(WeatherError::ServerError)` - If the API answered HTTP 500
    /// * `Err(WeatherError)` - If the request or parsing fails otherwise
    pub async fn fetch_forecast(
        &self,
        coords: Coordinates,
        units: &Units,
    ) -> Result<ForecastSnapshot, WeatherError> {
        let mut query: Vec<(&str, String)> = vec![
            ("latitude", coords.latitude.to_string()),
            ("longitude", coords.longitude.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        query.extend(
            units
                .query_params()
                .into_iter()
                .map(|(key, value)| (key, value.to_string())),
        );

        tracing::debug!(%coords, %units, "Fetching forecast");

        let response = self.client.get(&self.base_url).query(&query).send().await?;

        match response.status() {
            StatusCode::INTERNAL_SERVER_ERROR => return Err(WeatherError::ServerError),
            status if !status.is_success() => {
                return Err(WeatherError::UnexpectedStatus(status.as_u16()))
            }
            _ => {}
        }

        let text = response.text().await?;
        let api_response: OpenMeteoResponse = serde_json::from_str(&text)?;

        parse_response(api_response, *units)
    }
}

/// Parse the Open-Meteo API response into a ForecastSnapshot
fn parse_response(
    response: OpenMeteoResponse,
    units: Units,
) -> Result<ForecastSnapshot, WeatherError> {
    let current = response.current;

    let current = CurrentConditions {
        time: parse_datetime(&current.time)?,
        temperature: current.temperature_2m,
        feels_like: current.apparent_temperature,
        humidity: current.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
        precipitation: current.precipitation,
        wind_speed: current.wind_speed_10m,
        weather_code: current.weather_code,
    };

    Ok(ForecastSnapshot {
        current,
        hourly: parse_hourly_data(&response.hourly)?,
        daily: parse_daily_data(&response.daily)?,
        units,
        utc_offset_seconds: response.utc_offset_seconds,
        fetched_at: Utc::now(),
    })
}

/// Parse hourly weather data arrays into HourlyForecast structs
///
/// Hours a model does not cover come back as `null` and are skipped.
fn parse_hourly_data(hourly: &HourlyWeather) -> Result<Vec<HourlyForecast>, WeatherError> {
    let len = hourly.time.len();

    if hourly.temperature_2m.len() != len || hourly.weather_code.len() != len {
        return Err(WeatherError::MissingField(
            "hourly arrays have inconsistent lengths".to_string(),
        ));
    }

    let mut forecasts = Vec::with_capacity(len);

    for ((time, temperature), weather_code) in hourly
        .time
        .iter()
        .zip(&hourly.temperature_2m)
        .zip(&hourly.weather_code)
    {
        let (Some(temperature), Some(weather_code)) = (*temperature, *weather_code) else {
            tracing::debug!(%time, "Skipping hour without data");
            continue;
        };
        forecasts.push(HourlyForecast {
            time: parse_datetime(time)?,
            temperature,
            weather_code,
        });
    }

    Ok(forecasts)
}

/// Parse daily weather data arrays into DailyForecast structs
fn parse_daily_data(daily: &DailyWeather) -> Result<Vec<DailyForecast>, WeatherError> {
    let len = daily.time.len();

    if daily.weather_code.len() != len
        || daily.temperature_2m_max.len() != len
        || daily.temperature_2m_min.len() != len
    {
        return Err(WeatherError::MissingField(
            "daily arrays have inconsistent lengths".to_string(),
        ));
    }

    let mut forecasts = Vec::with_capacity(len);

    for i in 0..len {
        let (Some(weather_code), Some(temperature_max), Some(temperature_min)) = (
            daily.weather_code[i],
            daily.temperature_2m_max[i],
            daily.temperature_2m_min[i],
        ) else {
            tracing::debug!(date = %daily.time[i], "Skipping day without data");
            continue;
        };
        forecasts.push(DailyForecast {
            date: parse_date(&daily.time[i])?,
            weather_code,
            temperature_max,
            temperature_min,
        });
    }

    Ok(forecasts)
}

/// Parse a datetime string in ISO 8601 format (e.g., "2024-07-15T05:30") to NaiveDateTime
fn parse_datetime(datetime_str: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%dT%H:%M")
        .map_err(|_| WeatherError::InvalidTimeFormat(datetime_str.to_string()))
}

/// Parse a date string (e.g., "2024-07-15") to NaiveDate
fn parse_date(date_str: &str) -> Result<NaiveDate, WeatherError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| WeatherError::InvalidTimeFormat(date_str.to_string()))
}

/// Open-Meteo API response structure
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    current: CurrentWeather,
    hourly: HourlyWeather,
    daily: DailyWeather,
}

/// Current weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct CurrentWeather {
    time: String,
    temperature_2m: f64,
    precipitation: f64,
    wind_speed_10m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: u8,
}

/// Hourly weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct HourlyWeather {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    weather_code: Vec<Option<u8>>,
}

/// Daily weather data from Open-Meteo
#[derive(Debug, Deserialize)]
struct DailyWeather {
    time: Vec<String>,
    weather_code: Vec<Option<u8>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{TemperatureUnit, UnitSystem};

    /// Sample valid Open-Meteo API response
    const VALID_RESPONSE: &str = r#"{
        "latitude": 48.86,
        "longitude": 2.35,
        "generationtime_ms": 0.123,
        "utc_offset_seconds": 7200,
        "timezone": "Europe/Paris",
        "timezone_abbreviation": "CEST",
        "elevation": 43.0,
        "current_units": {
            "time": "iso8601",
            "interval": "seconds",
            "temperature_2m": "°C",
            "precipitation": "mm",
            "wind_speed_10m": "km/h",
            "relative_humidity_2m": "%",
            "apparent_temperature": "°C",
            "weather_code": "wmo code"
        },
        "current": {
            "time": "2026-10-18T14:00",
            "interval": 900,
            "temperature_2m": 16.4,
            "precipitation": 0.2,
            "wind_speed_10m": 11.9,
            "relative_humidity_2m": 72,
            "apparent_temperature": 15.1,
            "weather_code": 61
        },
        "hourly": {
            "time": ["2026-10-18T00:00", "2026-10-18T01:00", "2026-10-18T02:00"],
            "temperature_2m": [11.2, 10.8, 10.5],
            "weather_code": [3, 3, 45]
        },
        "daily": {
            "time": ["2026-10-18", "2026-10-19"],
            "weather_code": [61, 2],
            "temperature_2m_max": [17.0, 18.5],
            "temperature_2m_min": [9.6, 8.1]
        }
    }"#;

    fn parse(json: &str) -> Result<ForecastSnapshot, WeatherError> {
        let response: OpenMeteoResponse = serde_json::from_str(json)?;
        parse_response(response, Units::default())
    }

    #[test]
    fn test_parse_valid_response() {
        let snapshot = parse(VALID_RESPONSE).expect("Failed to parse forecast");

        assert!((snapshot.current.temperature - 16.4).abs() < 0.01);
        assert!((snapshot.current.feels_like - 15.1).abs() < 0.01);
        assert!((snapshot.current.precipitation - 0.2).abs() < 0.01);
        assert!((snapshot.current.wind_speed - 11.9).abs() < 0.01);
        assert_eq!(snapshot.current.humidity, 72);
        assert_eq!(snapshot.current.weather_code, 61);
        assert_eq!(snapshot.utc_offset_seconds, 7200);

        assert_eq!(snapshot.hourly.len(), 3);
        assert_eq!(snapshot.hourly[2].weather_code, 45);
        assert_eq!(
            snapshot.hourly[1].time,
            NaiveDateTime::parse_from_str("2026-10-18T01:00", "%Y-%m-%dT%H:%M").unwrap()
        );

        assert_eq!(snapshot.daily.len(), 2);
        assert_eq!(snapshot.daily[1].date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert!((snapshot.daily[1].temperature_max - 18.5).abs() < 0.01);
        assert!((snapshot.daily[1].temperature_min - 8.1).abs() < 0.01);
    }

    #[test]
    fn test_snapshot_carries_request_units() {
        let response: OpenMeteoResponse =
            serde_json::from_str(VALID_RESPONSE).expect("Failed to parse valid response");
        let snapshot = parse_response(response, UnitSystem::Imperial.units())
            .expect("Failed to parse forecast");

        assert_eq!(snapshot.units.temperature, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(
            parse("{ invalid json }"),
            Err(WeatherError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_missing_hourly_block() {
        let missing_hourly = r#"{
            "current": {
                "time": "2026-10-18T14:00",
                "temperature_2m": 16.4,
                "precipitation": 0.2,
                "wind_speed_10m": 11.9,
                "relative_humidity_2m": 72,
                "apparent_temperature": 15.1,
                "weather_code": 61
            },
            "daily": {
                "time": [],
                "weather_code": [],
                "temperature_2m_max": [],
                "temperature_2m_min": []
            }
        }"#;

        assert!(parse(missing_hourly).is_err());
    }

    #[test]
    fn test_parse_hourly_with_inconsistent_array_lengths() {
        let hourly = HourlyWeather {
            time: vec!["2026-10-18T00:00".to_string(), "2026-10-18T01:00".to_string()],
            temperature_2m: vec![Some(15.0)],
            weather_code: vec![Some(0), Some(0)],
        };

        match parse_hourly_data(&hourly) {
            Err(WeatherError::MissingField(msg)) => {
                assert!(msg.contains("inconsistent lengths"));
            }
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_daily_with_inconsistent_array_lengths() {
        let daily = DailyWeather {
            time: vec!["2026-10-18".to_string()],
            weather_code: vec![Some(0)],
            temperature_2m_max: vec![],
            temperature_2m_min: vec![Some(9.0)],
        };

        assert!(matches!(
            parse_daily_data(&daily),
            Err(WeatherError::MissingField(_))
        ));
    }

    #[test]
    fn test_null_entries_are_skipped() {
        let json = VALID_RESPONSE
            .replace("[11.2, 10.8, 10.5]", "[11.2, null, 10.5]")
            .replace("\"temperature_2m_min\": [9.6, 8.1]", "\"temperature_2m_min\": [9.6, null]");
        let snapshot = parse(&json).expect("nulls should not fail the snapshot");

        assert_eq!(snapshot.hourly.len(), 2);
        assert!((snapshot.hourly[1].temperature - 10.5).abs() < 0.01);
        assert_eq!(snapshot.hourly[1].weather_code, 45);

        assert_eq!(snapshot.daily.len(), 1);
        assert_eq!(snapshot.daily[0].date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2026-10-18T14:30").expect("Failed to parse datetime");
        assert_eq!(
            dt,
            NaiveDate::from_ymd_opt(2026, 10, 18)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_datetime_invalid() {
        // Missing T separator
        assert!(parse_datetime("2026-10-18 14:30").is_err());

        // Invalid format
        assert!(parse_datetime("not a datetime").is_err());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(matches!(
            parse_date("18/10/2026"),
            Err(WeatherError::InvalidTimeFormat(_))
        ));
    }
}
