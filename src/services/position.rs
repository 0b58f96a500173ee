// src/services/position.rs

//! Sources of the device position.

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Coordinates, Position, PositionOptions};

/// A one-shot provider of the current position.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Whether a position can be requested at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Request a single position fix.
    ///
    /// Denied permission is reported as `AppError::LocationUnavailable`.
    /// The caller enforces `options.timeout`.
    async fn current_position(&self, options: &PositionOptions) -> Result<Position>;
}

/// A device position known up front (command line or config file).
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Position> {
        Ok(Position::fresh(self.coordinates))
    }
}

/// Stand-in for an environment without any geolocation capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocationSource;

#[async_trait]
impl LocationSource for NoLocationSource {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(&self, _options: &PositionOptions) -> Result<Position> {
        Err(AppError::Unsupported)
    }
}
