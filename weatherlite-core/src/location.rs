//! Where the caller's position comes from.
//!
//! Acquiring a position is platform business; this crate only defines the seam
//! and a couple of trivial sources.

use async_trait::async_trait;

use crate::model::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Reported by platform sources when the user refuses location access.
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("No location fix available")]
    NoFix,
}

#[async_trait]
pub trait CoordinateSource: Send + Sync {
    async fn current_coordinate(&self) -> Result<Coordinate, LocationError>;
}

/// Always yields the same coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

#[async_trait]
impl CoordinateSource for FixedLocation {
    async fn current_coordinate(&self) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }
}

/// A source with no position, e.g. nothing configured and no flags given.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

#[async_trait]
impl CoordinateSource for Unavailable {
    async fn current_coordinate(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::NoFix)
    }
}
