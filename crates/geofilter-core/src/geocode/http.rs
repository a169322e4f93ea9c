// crates/geofilter-core/src/geocode/http.rs
#![cfg(feature = "http")]

//! HTTP geocoding provider speaking the common JSON geocoding format:
//!
//! ```json
//! { "status": "OK",
//!   "results": [ { "formatted_address": "...",
//!                  "geometry": { "location": { "lat": 32.08, "lng": 34.78 } },
//!                  "address_components": [ { "long_name": "Tel Aviv-Yafo", "types": ["locality"] } ] } ] }
//! ```

use super::{ForwardRequest, GeocodeCandidate, Geocoder};
use crate::city::PlaceComponent;
use crate::common::Coordinate;
use crate::error::{GeoError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: String,
    geometry: Option<Geometry>,
    #[serde(default)]
    address_components: Vec<PlaceComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinate,
}

#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpGeocoder {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GeoError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    async fn fetch(&self, mut params: Vec<(&'static str, String)>) -> Result<Vec<GeocodeCandidate>> {
        params.push(("key", self.api_key.clone()));

        let body = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(error = %e, "Geocoding API request failed");
                GeoError::ExternalService(format!("Geocoding API request failed: {e}"))
            })?
            .text()
            .await
            .map_err(|e| GeoError::ExternalService(format!("Failed to read geocoding response: {e}")))?;

        parse_response(&body)
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn forward(&self, request: &ForwardRequest) -> Result<Vec<GeocodeCandidate>> {
        debug!(address = %request.address, "Geocoding address");
        let mut params = vec![("address", request.address.clone())];
        if let Some(region) = &request.country_hint {
            params.push(("region", region.clone()));
            params.push(("components", format!("country:{region}")));
        }
        self.fetch(params).await
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<Vec<GeocodeCandidate>> {
        debug!(lat = coordinate.lat, lng = coordinate.lng, "Reverse geocoding");
        self.fetch(vec![("latlng", coordinate.to_string())]).await
    }
}

/// Map a provider body onto candidates. `ZERO_RESULTS` is an empty list,
/// any other non-`OK` status an [`GeoError::ExternalService`].
pub fn parse_response(body: &str) -> Result<Vec<GeocodeCandidate>> {
    let response: GeocodeResponse = serde_json::from_str(body)
        .map_err(|e| GeoError::ExternalService(format!("Failed to parse geocoding response: {e}")))?;

    match response.status.as_str() {
        "OK" => Ok(response
            .results
            .into_iter()
            .map(|r| GeocodeCandidate {
                formatted_address: r.formatted_address,
                coordinate: r.geometry.map(|g| g.location),
                components: r.address_components,
            })
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        status => Err(GeoError::ExternalService(format!(
            "provider status {status}: {}",
            response.error_message.unwrap_or_default()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ok_response() {
        let body = r#"{
            "status": "OK",
            "results": [{
                "formatted_address": "Dizengoff St 50, Tel Aviv-Yafo, Israel",
                "geometry": { "location": { "lat": 32.0775, "lng": 34.7747 }, "location_type": "ROOFTOP" },
                "address_components": [
                    { "long_name": "50", "short_name": "50", "types": ["street_number"] },
                    { "long_name": "Tel Aviv-Yafo", "short_name": "Tel Aviv-Yafo", "types": ["locality", "political"] }
                ]
            }]
        }"#;
        let candidates = parse_response(body).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].coordinate, Some(Coordinate::new(32.0775, 34.7747)));
        assert!(candidates[0].components[1].has_type("locality"));
    }

    #[test]
    fn zero_results_is_empty_not_error() {
        assert!(parse_response(r#"{ "status": "ZERO_RESULTS", "results": [] }"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn error_status_is_external_service_error() {
        let err = parse_response(r#"{ "status": "REQUEST_DENIED", "error_message": "bad key" }"#).unwrap_err();
        assert!(matches!(err, GeoError::ExternalService(ref m) if m.contains("bad key")));
        assert!(matches!(parse_response("<html>"), Err(GeoError::ExternalService(_))));
    }
}
