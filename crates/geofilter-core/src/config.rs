// crates/geofilter-core/src/config.rs

//! Configuration for the resolver stack.
//!
//! Every value is an externally supplied constant; nothing here is computed
//! at runtime. Missing JSON fields fall back to the defaults below.

use crate::coords::BoundingBox;
use crate::error::{GeoError, Result};
use crate::gazetteer::{Gazetteer, GazetteerEntry};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Street-name tokens that disqualify a segment or component as a city.
pub const DEFAULT_STREET_TOKENS: &[&str] = &[
    "st", "street", "rd", "road", "ave", "avenue", "blvd", "boulevard", "ln", "lane", "dr",
    "drive", "way", "hwy", "highway", "sq", "square", "sderot", "רחוב", "רח׳", "רח'", "שדרות", "שד׳",
    "שד'", "דרך",
];

/// Country and administrative-district tokens that are never a city.
pub const DEFAULT_REGION_TOKENS: &[&str] = &[
    "israel", "ישראל", "district", "מחוז", "region", "province", "county", "state",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Supported service area.
    pub region: BoundingBox,

    pub cache_ttl_secs: u64,

    /// Quiet period before a typed address is geocoded.
    pub debounce_ms: u64,

    /// Radius applied when a location source is first selected without one.
    pub min_default_radius_km: f64,

    pub device_timeout_ms: u64,

    /// Implicit country hint sent with forward lookups (ISO 3166-1 alpha-2).
    pub country_hint: Option<String>,

    pub known_cities: Vec<GazetteerEntry>,

    pub street_tokens: Vec<String>,

    pub region_tokens: Vec<String>,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            region: BoundingBox::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            debounce_ms: default_debounce_ms(),
            min_default_radius_km: default_min_radius_km(),
            device_timeout_ms: default_device_timeout_ms(),
            country_hint: Some("il".to_string()),
            known_cities: Gazetteer::builtin().entries().to_vec(),
            street_tokens: to_strings(DEFAULT_STREET_TOKENS),
            region_tokens: to_strings(DEFAULT_REGION_TOKENS),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_debounce_ms() -> u64 {
    600
}

fn default_min_radius_km() -> f64 {
    5.0
}

fn default_device_timeout_ms() -> u64 {
    10_000
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl GeoConfig {
    /// Load configuration from a JSON file
    #[cfg(feature = "json")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GeoError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GeoConfig = serde_json::from_str(json)
            .map_err(|e| GeoError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.region.check()?;

        if self.cache_ttl_secs == 0 {
            return Err(GeoError::Config("cache_ttl_secs must be positive".to_string()));
        }

        if !(self.min_default_radius_km.is_finite() && self.min_default_radius_km > 0.0) {
            return Err(GeoError::Config(
                "min_default_radius_km must be a positive number".to_string(),
            ));
        }

        if self.known_cities.iter().any(|e| e.name.trim().is_empty()) {
            return Err(GeoError::Config("known_cities contains a blank name".to_string()));
        }

        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_millis(self.device_timeout_ms)
    }

    pub fn gazetteer(&self) -> Gazetteer {
        Gazetteer::new(self.known_cities.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = GeoConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.debounce(), Duration::from_millis(600));
        assert_eq!(config.min_default_radius_km, 5.0);
        assert!(config.validate().is_ok());
        assert!(!config.known_cities.is_empty());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GeoConfig::from_json_str(r#"{ "debounce_ms": 250 }"#).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.region, BoundingBox::ISRAEL);
    }

    #[test]
    fn custom_region_and_cities_are_read() {
        let json = r#"{
            "region": { "min_lat": 45.8, "max_lat": 47.9, "min_lng": 5.9, "max_lng": 10.6 },
            "country_hint": "ch",
            "known_cities": [ { "name": "Zürich", "aliases": ["Zurich"] } ]
        }"#;
        let config = GeoConfig::from_json_str(json).unwrap();
        assert!(config.region.contains(47.37, 8.54));
        assert_eq!(config.country_hint.as_deref(), Some("ch"));
        assert_eq!(config.gazetteer().entries().len(), 1);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(GeoConfig::from_json_str(r#"{ "cache_ttl_secs": 0 }"#).is_err());
        assert!(GeoConfig::from_json_str(r#"{ "min_default_radius_km": -1 }"#).is_err());
        assert!(GeoConfig::from_json_str(
            r#"{ "region": { "min_lat": 10, "max_lat": 0, "min_lng": 0, "max_lng": 1 } }"#
        )
        .is_err());
        assert!(GeoConfig::from_json_str("not json").is_err());
    }

    #[cfg(feature = "json")]
    #[test]
    fn saved_config_reloads_from_file() {
        let config = GeoConfig {
            cache_ttl_secs: 90,
            debounce_ms: 0,
            country_hint: None,
            known_cities: vec![GazetteerEntry::new("Eilat", &["אילת"], 29.5577, 34.9519)],
            street_tokens: vec!["derech".to_string()],
            ..GeoConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geofilter.json");
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = GeoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.cache_ttl(), Duration::from_secs(90));
        assert_eq!(loaded.debounce_ms, 0);
        assert_eq!(loaded.country_hint, None);
        assert_eq!(loaded.known_cities, config.known_cities);
        assert_eq!(loaded.street_tokens, vec!["derech".to_string()]);
        assert_eq!(loaded.region, BoundingBox::ISRAEL);
    }

    #[cfg(feature = "json")]
    #[test]
    fn unreadable_or_invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(GeoConfig::from_file(&missing), Err(GeoError::Config(_))));

        let zero_ttl = dir.path().join("zero.json");
        std::fs::write(&zero_ttl, r#"{ "cache_ttl_secs": 0 }"#).unwrap();
        assert!(matches!(GeoConfig::from_file(&zero_ttl), Err(GeoError::Config(_))));
    }
}
