// crates/geofilter-core/src/testing.rs

//! Testing utilities including mock implementations.
//!
//! These are useful for exercising code that depends on geocoding or device
//! location without making network or platform calls.

use crate::cache::{forward_key, reverse_key};
use crate::city::PlaceComponent;
use crate::common::Coordinate;
use crate::device::LocationSource;
use crate::error::{GeoError, Result};
use crate::geocode::{ForwardRequest, GeocodeCandidate, Geocoder};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

/// Record of a call made to the mock geocoder.
#[derive(Debug, Clone, PartialEq)]
pub enum MockGeocodeCall {
    Forward { request: ForwardRequest },
    Reverse { coordinate: Coordinate },
}

/// A mock geocoder with canned responses and call tracking.
///
/// Unknown addresses and coordinates answer with an empty candidate list.
/// Clones share responses and the call log.
#[derive(Clone, Default)]
pub struct MockGeocoder {
    forward: Arc<RwLock<HashMap<String, Vec<GeocodeCandidate>>>>,
    reverse: Arc<RwLock<HashMap<String, Vec<GeocodeCandidate>>>>,
    delay: Option<Duration>,
    failing: bool,
    calls: Arc<Mutex<Vec<MockGeocodeCall>>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate for an address (matched after normalization).
    pub fn with_forward(self, address: &str, candidate: GeocodeCandidate) -> Self {
        self.forward
            .write()
            .unwrap()
            .entry(forward_key(address))
            .or_default()
            .push(candidate);
        self
    }

    pub fn with_reverse(self, lat: f64, lng: f64, candidate: GeocodeCandidate) -> Self {
        self.reverse
            .write()
            .unwrap()
            .entry(reverse_key(lat, lng))
            .or_default()
            .push(candidate);
        self
    }

    /// Every call waits this long (on the tokio clock) before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call fails with [`GeoError::ExternalService`].
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> Vec<MockGeocodeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn answer(
        &self,
        call: MockGeocodeCall,
        table: &RwLock<HashMap<String, Vec<GeocodeCandidate>>>,
        key: String,
    ) -> Result<Vec<GeocodeCandidate>> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(GeoError::ExternalService("mock provider is down".into()));
        }
        Ok(table.read().unwrap().get(&key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn forward(&self, request: &ForwardRequest) -> Result<Vec<GeocodeCandidate>> {
        let key = forward_key(&request.address);
        let call = MockGeocodeCall::Forward { request: request.clone() };
        self.answer(call, &self.forward, key).await
    }

    async fn reverse(&self, coordinate: Coordinate) -> Result<Vec<GeocodeCandidate>> {
        let key = reverse_key(coordinate.lat, coordinate.lng);
        self.answer(MockGeocodeCall::Reverse { coordinate }, &self.reverse, key)
            .await
    }
}

/// Build a provider candidate.
pub fn candidate(
    formatted_address: &str,
    coordinate: Option<Coordinate>,
    components: Vec<PlaceComponent>,
) -> GeocodeCandidate {
    GeocodeCandidate {
        formatted_address: formatted_address.to_string(),
        coordinate,
        components,
    }
}

type ErrorFactory = Arc<dyn Fn() -> GeoError + Send + Sync>;

/// A mock device location source.
#[derive(Clone)]
pub struct MockLocationSource {
    position: Option<Coordinate>,
    error: Option<ErrorFactory>,
    delay: Option<Duration>,
    calls: Arc<Mutex<usize>>,
}

impl MockLocationSource {
    pub fn at(position: Coordinate) -> Self {
        Self {
            position: Some(position),
            error: None,
            delay: None,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing(error: impl Fn() -> GeoError + Send + Sync + 'static) -> Self {
        Self {
            position: None,
            error: Some(Arc::new(error)),
            delay: None,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LocationSource for MockLocationSource {
    async fn current_position(&self) -> Result<Coordinate> {
        *self.calls.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match (&self.error, self.position) {
            (Some(make_error), _) => Err((make_error.as_ref())()),
            (None, Some(position)) => Ok(position),
            (None, None) => Err(GeoError::PermissionDenied("no position configured".into())),
        }
    }
}
