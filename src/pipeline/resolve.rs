// src/pipeline/resolve.rs

//! "Use my current location": position → neighborhood → persisted selection.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::timeout;

use crate::error::{AppError, Result};
use crate::models::{Config, Coordinates, PositionOptions, SelectedLocation};
use crate::services::{GeocoderChain, LocationSource};
use crate::storage::SelectionStore;

/// Turns a position request into a persisted neighborhood selection.
///
/// Calls are independent of each other: two concurrent resolutions both run
/// to completion and the later write wins.
pub struct LocationResolver {
    source: Arc<dyn LocationSource>,
    geocoder: GeocoderChain,
    store: SelectionStore,
    options: PositionOptions,
}

impl LocationResolver {
    pub fn new(
        source: Arc<dyn LocationSource>,
        geocoder: GeocoderChain,
        store: SelectionStore,
    ) -> Self {
        Self {
            source,
            geocoder,
            store,
            options: PositionOptions::default(),
        }
    }

    /// Build the default provider chain and position options from `config`.
    pub fn from_config(
        config: &Config,
        source: Arc<dyn LocationSource>,
        store: SelectionStore,
    ) -> Result<Self> {
        let geocoder = GeocoderChain::from_config(config)?;
        Ok(Self::new(source, geocoder, store).with_options(config.geolocation.position_options()))
    }

    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Resolve the current position and persist the resulting selection.
    ///
    /// Only `Unsupported` and `LocationUnavailable` come back from the
    /// position step; geocoding failures degrade to the placeholder
    /// neighborhood. On error nothing is written.
    pub async fn resolve_current_location(&self) -> Result<SelectedLocation> {
        let coordinates = self.acquire_coordinates().await?;

        let address = self.geocoder.reverse_geocode(coordinates).await;
        let location = SelectedLocation::from_neighborhood(address.neighborhood_name);

        self.store.save(&location).await?;
        log::info!(
            "Neighborhood set to {} ({} candidate(s))",
            location.selected_neighborhood,
            location.neighborhood_candidates.len()
        );
        Ok(location)
    }

    /// Request one position fix under the configured options.
    pub async fn acquire_coordinates(&self) -> Result<Coordinates> {
        if !self.source.is_supported() {
            log::error!("No geolocation capability available");
            return Err(AppError::Unsupported);
        }

        let requested_at = Utc::now();
        let request = self.source.current_position(&self.options);
        let position = match timeout(self.options.timeout, request).await {
            Ok(Ok(position)) => position,
            Ok(Err(AppError::Unsupported)) => return Err(AppError::Unsupported),
            Ok(Err(AppError::LocationUnavailable(reason))) => {
                log::error!("Position request failed: {}", reason);
                return Err(AppError::LocationUnavailable(reason));
            }
            Ok(Err(e)) => {
                log::error!("Position request failed: {}", e);
                return Err(AppError::location_unavailable(e));
            }
            Err(_) => {
                log::error!("Position request timed out after {:?}", self.options.timeout);
                return Err(AppError::location_unavailable(format!(
                    "timed out after {} ms",
                    self.options.timeout.as_millis()
                )));
            }
        };

        if !position.is_fresh_for(requested_at, self.options.maximum_age) {
            return Err(AppError::location_unavailable(format!(
                "position fix from {} is older than the allowed {} ms",
                position.timestamp,
                self.options.maximum_age.as_millis()
            )));
        }

        log::debug!(
            "Position fix ({}, {}) accuracy {:?} m",
            position.coordinates.latitude,
            position.coordinates.longitude,
            position.accuracy_m
        );
        Ok(position.coordinates)
    }
}
