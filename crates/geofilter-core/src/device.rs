// crates/geofilter-core/src/device.rs

//! Device-sensed location acquisition.
//!
//! A loading flag keeps one affordance from issuing duplicate concurrent
//! requests. Denial and timeout settle into distinct states; nothing is
//! retried automatically.

use crate::common::Coordinate;
use crate::config::GeoConfig;
use crate::coords::CoordinateValidator;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Platform geolocation.
///
/// Implementations report a refused or unavailable permission as
/// [`crate::GeoError::PermissionDenied`].
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeviceFix {
    Located { coordinate: Coordinate, in_region: bool },
    Failed { kind: ErrorKind },
    /// A request from this locator is already outstanding.
    Busy,
}

impl DeviceFix {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            DeviceFix::Located { coordinate, .. } => Some(*coordinate),
            _ => None,
        }
    }
}

pub struct DeviceLocator<S> {
    source: S,
    validator: CoordinateValidator,
    timeout: Duration,
    loading: AtomicBool,
}

/// Clears the loading flag however `locate` exits, including cancellation.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: LocationSource> DeviceLocator<S> {
    pub fn new(source: S, config: &GeoConfig) -> Self {
        Self {
            source,
            validator: CoordinateValidator::new(config.region),
            timeout: config.device_timeout(),
            loading: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn locate(&self) -> DeviceFix {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("device location already loading; ignoring request");
            return DeviceFix::Busy;
        }
        let _guard = LoadingGuard(&self.loading);

        let position = match tokio::time::timeout(self.timeout, self.source.current_position()).await {
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "device location timed out");
                return DeviceFix::Failed { kind: ErrorKind::Timeout };
            }
            Ok(Err(err)) => {
                let kind = err.kind();
                if kind == ErrorKind::PermissionDenied {
                    info!(error = %err, "device location permission denied");
                } else {
                    warn!(error = %err, "device location unavailable");
                }
                return DeviceFix::Failed { kind };
            }
            Ok(Ok(position)) => position,
        };

        match self.validator.validate(position.lat, position.lng) {
            Ok(coordinate) => DeviceFix::Located {
                coordinate,
                in_region: self.validator.is_in_region(&coordinate),
            },
            Err(err) => {
                warn!(error = %err, "device reported an invalid coordinate");
                DeviceFix::Failed { kind: err.kind() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLocationSource;
    use crate::GeoError;
    use std::sync::Arc;

    fn locator(source: MockLocationSource) -> DeviceLocator<MockLocationSource> {
        DeviceLocator::new(source, &GeoConfig::default())
    }

    #[tokio::test]
    async fn located_inside_region() {
        let source = MockLocationSource::at(Coordinate::new(32.08, 34.78));
        let fix = locator(source).locate().await;
        assert_eq!(
            fix,
            DeviceFix::Located { coordinate: Coordinate::new(32.08, 34.78), in_region: true }
        );
    }

    #[tokio::test]
    async fn outside_region_is_still_located_but_flagged() {
        let fix = locator(MockLocationSource::at(Coordinate::new(51.5, -0.12))).locate().await;
        assert!(matches!(fix, DeviceFix::Located { in_region: false, .. }));
    }

    #[tokio::test]
    async fn denial_is_distinct_from_outage() {
        let denied = locator(MockLocationSource::failing(|| GeoError::PermissionDenied("blocked".into())));
        assert_eq!(denied.locate().await, DeviceFix::Failed { kind: ErrorKind::PermissionDenied });

        let broken = locator(MockLocationSource::failing(|| GeoError::ExternalService("no gps".into())));
        assert_eq!(broken.locate().await, DeviceFix::Failed { kind: ErrorKind::ExternalService });
    }

    #[tokio::test]
    async fn invalid_device_coordinate_is_rejected() {
        let fix = locator(MockLocationSource::at(Coordinate::new(123.0, 34.0))).locate().await;
        assert_eq!(fix, DeviceFix::Failed { kind: ErrorKind::InvalidInput });
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_settles_without_retry() {
        let source = MockLocationSource::at(Coordinate::new(32.08, 34.78))
            .with_delay(Duration::from_secs(60));
        let locator = locator(source.clone());
        assert_eq!(locator.locate().await, DeviceFix::Failed { kind: ErrorKind::Timeout });
        assert_eq!(source.calls(), 1);
        assert!(!locator.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_request_is_busy() {
        let source = MockLocationSource::at(Coordinate::new(32.08, 34.78))
            .with_delay(Duration::from_millis(500));
        let locator = Arc::new(locator(source.clone()));

        let first = tokio::spawn({
            let locator = Arc::clone(&locator);
            async move { locator.locate().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(locator.is_loading());
        assert_eq!(locator.locate().await, DeviceFix::Busy);

        assert!(first.await.unwrap().coordinate().is_some());
        assert_eq!(source.calls(), 1);
        assert!(!locator.is_loading());
    }
}
