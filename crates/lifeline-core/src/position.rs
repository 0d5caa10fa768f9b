//! Position acquisition.
//!
//! The resolver asks a [`PositionProvider`] for the device's current fix.
//! The provider is passed per call so that each request carries its own
//! source: a fixed point in tests and tools, or the fix the mobile client
//! reported in its request body.

use std::future::Future;

use lifeline_geo::validate_coordinate;
use lifeline_types::Coordinate;
use serde::{Deserialize, Serialize};

/// Errors that can occur while acquiring a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The user refused location permission.
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider failed to produce a fix.
    #[error("position provider error: {0}")]
    Provider(String),

    /// The provider did not answer within the deadline.
    #[error("position acquisition timed out after {timeout_ms}ms")]
    Timeout {
        /// The deadline in milliseconds.
        timeout_ms: u64,
    },
}

/// A source of the device's current position.
pub trait PositionProvider: Send + Sync {
    /// Acquire the current position.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::PermissionDenied`] if the user refused
    /// location access, or [`PositionError::Provider`] for any other failure.
    fn current_position(&self) -> impl Future<Output = Result<Coordinate, PositionError>> + Send;
}

/// A provider that always answers with the same coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPosition(pub Coordinate);

impl PositionProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinate, PositionError> {
        Ok(self.0)
    }
}

/// A position the client reported alongside its request.
///
/// The mobile app resolves location permission on the device and sends
/// the outcome; this provider replays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportedPosition {
    /// Permission granted and a fix obtained.
    Granted {
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },
    /// Permission refused.
    Denied,
    /// The device could not produce a fix.
    Error {
        /// Device-side error description.
        message: String,
    },
}

impl PositionProvider for ReportedPosition {
    async fn current_position(&self) -> Result<Coordinate, PositionError> {
        match self {
            Self::Granted {
                latitude,
                longitude,
            } => validate_coordinate(Coordinate::new(*latitude, *longitude))
                .map_err(|e| PositionError::Provider(e.to_string())),
            Self::Denied => Err(PositionError::PermissionDenied),
            Self::Error { message } => Err(PositionError::Provider(message.clone())),
        }
    }
}
