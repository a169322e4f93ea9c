// crates/geofilter-core/src/error.rs

//! Error types shared by every component of the crate.

use serde::Serialize;
use thiserror::Error;

/// Main error type for all geofilter operations.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Malformed address or out-of-range coordinate.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Coordinate is numerically valid but lies outside the configured region.
    #[error("Coordinate {lat},{lng} is outside the supported region")]
    RegionMismatch { lat: f64, lng: f64 },

    /// The lookup provider failed, timed out or answered with an error status.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// The lookup succeeded but produced no usable candidate.
    #[error("No result: {0}")]
    NoResult(String),

    /// Device location access was denied or is unavailable.
    #[error("Location permission denied: {0}")]
    PermissionDenied(String),

    /// Device location acquisition did not settle in time.
    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for geofilter operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Copyable classification of a [`GeoError`].
///
/// Lookups never hand errors to the caller; they report one of these kinds
/// instead, and negative cache entries remember the kind that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    RegionMismatch,
    ExternalService,
    NoResult,
    PermissionDenied,
    Timeout,
    Config,
    NotFound,
    Io,
}

impl GeoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeoError::InvalidInput(_) => ErrorKind::InvalidInput,
            GeoError::RegionMismatch { .. } => ErrorKind::RegionMismatch,
            GeoError::ExternalService(_) => ErrorKind::ExternalService,
            GeoError::NoResult(_) => ErrorKind::NoResult,
            GeoError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            GeoError::Timeout(_) => ErrorKind::Timeout,
            GeoError::Config(_) => ErrorKind::Config,
            GeoError::NotFound(_) => ErrorKind::NotFound,
            GeoError::Io(_) => ErrorKind::Io,
            GeoError::Json(_) => ErrorKind::Config,
        }
    }
}

impl ErrorKind {
    /// Whether the user can fix this themselves (grant permission, edit input)
    /// as opposed to waiting out a provider problem.
    pub fn is_user_fixable(self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidInput | ErrorKind::RegionMismatch | ErrorKind::PermissionDenied
        )
    }
}
