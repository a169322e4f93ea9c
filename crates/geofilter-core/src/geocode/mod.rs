// crates/geofilter-core/src/geocode/mod.rs

//! # Geocoding with memoization and cancellation
//!
//! [`GeocodeCache`] wraps a [`Geocoder`] provider:
//! - forward lookups are keyed by the trimmed, case-folded address,
//!   reverse lookups by the coordinate at six decimals;
//! - entries live for the configured TTL (five minutes by default), and
//!   failures are cached for the same time so a failing provider is not
//!   hammered;
//! - only the latest forward and the latest reverse lookup may deliver a
//!   result; starting a new one supersedes the previous one;
//! - returned coordinates pass through the [`CoordinateValidator`].
//!
//! Provider errors never escape as `Err`: every call settles into a
//! [`Lookup`].

#[cfg(feature = "http")]
pub mod http;

use crate::cache::{forward_key, reverse_key, CacheStats, CacheStore, Cached, Clock, SystemClock};
use crate::city::{CityExtractor, PlaceComponent};
use crate::common::{City, Coordinate};
use crate::config::GeoConfig;
use crate::coords::CoordinateValidator;
use crate::error::{ErrorKind, GeoError, Result};
use crate::task::{TaskHandle, TaskSlot};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

// -----------------------------------------------------------------------------
// PROVIDER SEAM
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardRequest {
    /// Normalized (trimmed, case-folded) address.
    pub address: String,
    /// ISO 3166-1 alpha-2 bias, e.g. `"il"`.
    pub country_hint: Option<String>,
}

/// One result from a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub formatted_address: String,
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub components: Vec<PlaceComponent>,
}

/// External forward/reverse lookup service.
///
/// Both calls are one-shot. Errors should use [`GeoError::ExternalService`];
/// an empty list means "nothing found".
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, request: &ForwardRequest) -> Result<Vec<GeocodeCandidate>>;

    async fn reverse(&self, coordinate: Coordinate) -> Result<Vec<GeocodeCandidate>>;
}

#[async_trait]
impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    async fn forward(&self, request: &ForwardRequest) -> Result<Vec<GeocodeCandidate>> {
        (**self).forward(request).await
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<Vec<GeocodeCandidate>> {
        (**self).reverse(coordinate).await
    }
}

// -----------------------------------------------------------------------------
// RESULTS
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardGeocode {
    pub coordinate: Coordinate,
    pub formatted_address: String,
    pub city: City,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReverseGeocode {
    pub coordinate: Coordinate,
    pub address: String,
    pub city: City,
}

/// How a lookup settled.
#[derive(Debug)]
pub enum Lookup<T> {
    /// A usable result. `cached` is true when no provider call was made.
    Found { value: Arc<T>, cached: bool },
    /// No usable result, and why.
    Missing { kind: ErrorKind, cached: bool },
    /// A newer lookup (or an explicit cancel) replaced this one; its
    /// outcome must not be shown.
    Superseded,
}

impl<T> Lookup<T> {
    pub fn value(&self) -> Option<&Arc<T>> {
        match self {
            Lookup::Found { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Arc<T>> {
        match self {
            Lookup::Found { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(
            self,
            Lookup::Found { cached: true, .. } | Lookup::Missing { cached: true, .. }
        )
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Lookup::Superseded)
    }

    pub fn missing_kind(&self) -> Option<ErrorKind> {
        match self {
            Lookup::Missing { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    fn from_cached(cached: Cached<T>) -> Self {
        match cached {
            Cached::Hit(value) => Lookup::Found { value, cached: true },
            Cached::Negative(kind) => Lookup::Missing { kind, cached: true },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GeocodeStats {
    pub forward: CacheStats,
    pub reverse: CacheStats,
    /// Provider calls actually issued.
    pub external_calls: u64,
}

// -----------------------------------------------------------------------------
// CACHE
// -----------------------------------------------------------------------------

pub struct GeocodeCache<G> {
    geocoder: G,
    validator: CoordinateValidator,
    extractor: CityExtractor,
    country_hint: Option<String>,
    debounce: Duration,
    forward_cache: Mutex<CacheStore<ForwardGeocode>>,
    reverse_cache: Mutex<CacheStore<ReverseGeocode>>,
    forward_slot: TaskSlot,
    reverse_slot: TaskSlot,
    external_calls: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl<G: Geocoder> GeocodeCache<G> {
    pub fn new(geocoder: G, config: &GeoConfig) -> Self {
        Self::with_clock(geocoder, config, Arc::new(SystemClock))
    }

    pub fn with_clock(geocoder: G, config: &GeoConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            geocoder,
            validator: CoordinateValidator::new(config.region),
            extractor: CityExtractor::from_config(config),
            country_hint: config.country_hint.clone(),
            debounce: config.debounce(),
            forward_cache: Mutex::new(CacheStore::new(config.cache_ttl(), Arc::clone(&clock))),
            reverse_cache: Mutex::new(CacheStore::new(config.cache_ttl(), clock)),
            forward_slot: TaskSlot::new(),
            reverse_slot: TaskSlot::new(),
            external_calls: AtomicU64::new(0),
        }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn debounce_window(&self) -> Duration {
        self.debounce
    }

    /// Address → coordinate (plus the city the provider's components name).
    ///
    /// Supersedes any forward lookup still pending on this instance.
    pub async fn forward(&self, address: &str) -> Lookup<ForwardGeocode> {
        let handle = self.forward_slot.begin();
        self.forward_with(&handle, address).await
    }

    /// [`forward`](Self::forward) for text being typed: fires only after the
    /// input has been stable for the debounce window. Every call restarts the
    /// window; earlier calls settle as [`Lookup::Superseded`].
    pub async fn forward_debounced(&self, address: &str) -> Lookup<ForwardGeocode> {
        let handle = self.forward_slot.begin();
        if forward_key(address).is_empty() {
            return Lookup::Missing { kind: ErrorKind::InvalidInput, cached: false };
        }
        if handle.run(tokio::time::sleep(self.debounce)).await.is_none() {
            debug!("debounced forward geocode superseded by newer input");
            return Lookup::Superseded;
        }
        self.forward_with(&handle, address).await
    }

    async fn forward_with(&self, handle: &TaskHandle, address: &str) -> Lookup<ForwardGeocode> {
        let key = forward_key(address);
        if key.is_empty() {
            return Lookup::Missing { kind: ErrorKind::InvalidInput, cached: false };
        }

        if let Some(hit) = lock(&self.forward_cache).get(&key) {
            debug!(key = %key, "forward geocode cache hit");
            return Lookup::from_cached(hit);
        }

        let request = ForwardRequest {
            address: key.clone(),
            country_hint: self.country_hint.clone(),
        };
        self.external_calls.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "forward geocode request");

        let Some(response) = handle.run(self.geocoder.forward(&request)).await else {
            debug!(key = %key, "forward geocode superseded; response discarded");
            return Lookup::Superseded;
        };

        let mut cache = lock(&self.forward_cache);
        match self.settle_forward(response) {
            Ok(result) => Lookup::Found { value: cache.insert(key, result), cached: false },
            Err(err) => {
                warn!(key = %key, error = %err, "forward geocode produced no result; caching negative");
                let kind = err.kind();
                cache.insert_negative(key, kind);
                Lookup::Missing { kind, cached: false }
            }
        }
    }

    fn settle_forward(&self, response: Result<Vec<GeocodeCandidate>>) -> Result<ForwardGeocode> {
        let first = response?
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::NoResult("provider returned no candidates".into()))?;
        let raw = first
            .coordinate
            .ok_or_else(|| GeoError::NoResult("candidate has no coordinate".into()))?;
        let coordinate = self
            .validator
            .validate_region(raw.lat, raw.lng)
            .map_err(|err| match err {
                GeoError::InvalidInput(msg) => GeoError::NoResult(format!("provider returned {msg}")),
                other => other,
            })?;
        let city = self
            .extractor
            .from_components(&first.components, Some(&first.formatted_address));

        Ok(ForwardGeocode {
            coordinate,
            formatted_address: first.formatted_address,
            city,
        })
    }

    /// Coordinate → address and city.
    ///
    /// Out-of-range input settles as [`ErrorKind::InvalidInput`], and points
    /// outside the service region as [`ErrorKind::RegionMismatch`]. Neither
    /// reaches the provider or the cache.
    pub async fn reverse(&self, lat: f64, lng: f64) -> Lookup<ReverseGeocode> {
        let handle = self.reverse_slot.begin();
        let coordinate = match self.validator.validate_region(lat, lng) {
            Ok(c) => c,
            Err(err) => {
                debug!(lat, lng, error = %err, "reverse geocode rejected input");
                return Lookup::Missing { kind: err.kind(), cached: false };
            }
        };

        let key = reverse_key(lat, lng);
        if let Some(hit) = lock(&self.reverse_cache).get(&key) {
            debug!(key = %key, "reverse geocode cache hit");
            return Lookup::from_cached(hit);
        }

        self.external_calls.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "reverse geocode request");

        let Some(response) = handle.run(self.geocoder.reverse(coordinate)).await else {
            debug!(key = %key, "reverse geocode superseded; response discarded");
            return Lookup::Superseded;
        };

        let mut cache = lock(&self.reverse_cache);
        match self.settle_reverse(coordinate, response) {
            Ok(result) => Lookup::Found { value: cache.insert(key, result), cached: false },
            Err(err) => {
                warn!(key = %key, error = %err, "reverse geocode produced no result; caching negative");
                let kind = err.kind();
                cache.insert_negative(key, kind);
                Lookup::Missing { kind, cached: false }
            }
        }
    }

    fn settle_reverse(
        &self,
        coordinate: Coordinate,
        response: Result<Vec<GeocodeCandidate>>,
    ) -> Result<ReverseGeocode> {
        let first = response?
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::NoResult("provider returned no candidates".into()))?;
        let city = self
            .extractor
            .from_reverse_components(&first.components, &first.formatted_address);
        if city.is_unspecified() && first.formatted_address.trim().is_empty() {
            return Err(GeoError::NoResult("candidate names no place".into()));
        }

        Ok(ReverseGeocode {
            coordinate,
            address: first.formatted_address,
            city,
        })
    }

    /// Supersede any pending lookups (e.g. the consumer is going away).
    pub fn cancel_pending(&self) {
        self.forward_slot.cancel();
        self.reverse_slot.cancel();
    }

    pub fn clear(&self) {
        lock(&self.forward_cache).clear();
        lock(&self.reverse_cache).clear();
    }

    pub fn stats(&self) -> GeocodeStats {
        GeocodeStats {
            forward: lock(&self.forward_cache).stats(),
            reverse: lock(&self.reverse_cache).stats(),
            external_calls: self.external_calls.load(Ordering::Relaxed),
        }
    }
}

impl<G> std::fmt::Debug for GeocodeCache<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeCache")
            .field("country_hint", &self.country_hint)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}
