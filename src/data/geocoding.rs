//! Geocoding and reverse geocoding clients
//!
//! City names are resolved through the Open-Meteo geocoding API; coordinates
//! from geolocation are turned back into a place name through Nominatim
//! (OpenStreetMap). Neither service requires an API key.

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::{http_client, Coordinates, Place, PlaceName};

/// Base URL for the Open-Meteo geocoding API
pub const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Base URL for the Nominatim reverse geocoding API
pub const REVERSE_GEOCODING_BASE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Number of suggestions shown in the search dropdown
pub const SUGGESTION_COUNT: u8 = 4;

/// Queries shorter than this never trigger a suggestion lookup
pub const MIN_SUGGESTION_QUERY_LEN: usize = 3;

/// Errors that can occur when geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// The geocoder returned no results for the name
    #[error("No results found for '{0}'")]
    NotFound(String),

    /// The service answered with HTTP 500
    #[error("Geocoding server error (HTTP 500)")]
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

    /// Reverse geocoding returned no usable address
    #[error("No address found for {0}")]
    MissingAddress(Coordinates),
}

/// Client for forward and reverse geocoding
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    search_url: String,
    reverse_url: String,
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodingClient {
    /// Create a new GeocodingClient pointing at the public services
    pub fn new() -> Self {
        Self::with_client(http_client(), GEOCODING_BASE_URL, REVERSE_GEOCODING_BASE_URL)
    }

    /// Create a new GeocodingClient with a custom HTTP client and endpoints
    pub fn with_client(
        client: Client,
        search_url: impl Into<String>,
        reverse_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            search_url: search_url.into(),
            reverse_url: reverse_url.into(),
        }
    }

    /// Create a new GeocodingClient with custom endpoints
    pub fn with_base_urls(search_url: impl Into<String>, reverse_url: impl Into<String>) -> Self {
        Self::with_client(http_client(), search_url, reverse_url)
    }

    /// Resolves a city name to its first geocoding match
    ///
    /// # Returns
    /// * `Ok(Place)` - The first result; there is no disambiguation
    /// * `Err(GeocodingError::NotFound)` - If the geocoder has no results
    /// * `Err(GeocodingError::ServerError)` - If the geocoder answered HTTP 500
    pub async fn resolve_city(&self, name: &str) -> Result<Place, GeocodingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GeocodingError::NotFound(String::new()));
        }

        let place = self
            .search(name, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::NotFound(name.to_string()))?;

        tracing::info!(city = name, resolved = %place.place_name(), "Resolved city");
        Ok(place)
    }

    /// Looks up dropdown suggestions for a partially typed city name
    ///
    /// Returns an empty list without a request for queries shorter than
    /// [`MIN_SUGGESTION_QUERY_LEN`] characters.
    pub async fn suggest_cities(&self, query: &str) -> Result<Vec<Place>, GeocodingError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGESTION_QUERY_LEN {
            return Ok(Vec::new());
        }

        self.search(query, SUGGESTION_COUNT).await
    }

    /// Turns coordinates into a city (or state) and country name
    pub async fn reverse_geocode(&self, coords: Coordinates) -> Result<PlaceName, GeocodingError> {
        let query = [
            ("format", "json".to_string()),
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
        ];

        let response = self
            .client
            .get(&self.reverse_url)
            .query(&query)
            .send()
            .await?;
        let text = check_status(response)?.text().await?;
        let body: NominatimResponse = serde_json::from_str(&text)?;

        let address = body
            .address
            .ok_or(GeocodingError::MissingAddress(coords))?;

        let name = address
            .city
            .or(address.town)
            .or(address.village)
            .or(address.state)
            .ok_or(GeocodingError::MissingAddress(coords))?;

        let place = PlaceName {
            name,
            country: address.country.unwrap_or_default(),
        };

        tracing::info!("Reverse geocoded {} to: {}", coords, place);
        Ok(place)
    }

    async fn search(&self, name: &str, count: u8) -> Result<Vec<Place>, GeocodingError> {
        let query = [("name", name.to_string()), ("count", count.to_string())];

        let response = self
            .client
            .get(&self.search_url)
            .query(&query)
            .send()
            .await?;
        let text = check_status(response)?.text().await?;
        let body: SearchResponse = serde_json::from_str(&text)?;

        Ok(body.results.unwrap_or_default())
    }
}

fn check_status(response: Response) -> Result<Response, GeocodingError> {
    match response.status() {
        StatusCode::INTERNAL_SERVER_ERROR => Err(GeocodingError::ServerError),
        status if !status.is_success() => Err(GeocodingError::UnexpectedStatus(status.as_u16())),
        _ => Ok(response),
    }
}

/// Open-Meteo geocoding response; `results` is absent when nothing matched
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<Place>>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_without_results_key() {
        let body: SearchResponse =
            serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).expect("Failed to parse");
        assert!(body.results.is_none());
    }

    #[test]
    fn test_search_response_with_results() {
        let json = r#"{
            "results": [
                {
                    "id": 2988507,
                    "name": "Paris",
                    "latitude": 48.85341,
                    "longitude": 2.3488,
                    "country_code": "FR",
                    "admin1": "Île-de-France",
                    "country": "France"
                }
            ]
        }"#;

        let body: SearchResponse = serde_json::from_str(json).expect("Failed to parse");
        let results = body.results.expect("results should be present");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Paris");
        assert_eq!(results[0].admin1.as_deref(), Some("Île-de-France"));
    }

    #[test]
    fn test_nominatim_error_body_has_no_address() {
        let body: NominatimResponse =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).expect("Failed to parse");
        assert!(body.address.is_none());
    }

    #[tokio::test]
    async fn test_short_suggestion_query_skips_request() {
        // Unroutable endpoint: any request would fail
        let client = GeocodingClient::with_base_urls("http://127.0.0.1:9/search", "http://127.0.0.1:9/reverse");
        let suggestions = client.suggest_cities(" pa ").await.expect("Should not hit the network");
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_blank_city_is_not_found() {
        let client = GeocodingClient::with_base_urls("http://127.0.0.1:9/search", "http://127.0.0.1:9/reverse");
        assert!(matches!(
            client.resolve_city("   ").await,
            Err(GeocodingError::NotFound(_))
        ));
    }
}
