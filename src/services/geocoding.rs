// src/services/geocoding.rs

//! Reverse geocoding provider chain.
//!
//! Providers are tried strictly in order. A provider that is unavailable is
//! skipped, one that fails is logged and skipped, and the first success wins.
//! When nothing answers the chain falls back to a placeholder address, so
//! reverse geocoding itself never fails.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, Coordinates, ResolvedAddress};

#[cfg(feature = "kakao")]
use super::KakaoProvider;
use super::NominatimProvider;

/// A service that turns coordinates into an address.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Whether the provider is configured well enough to be called.
    fn is_available(&self) -> bool {
        true
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<ResolvedAddress>;
}

/// Ordered list of providers with sequential fallback.
pub struct GeocoderChain {
    providers: Vec<Box<dyn GeocodingProvider>>,
}

impl GeocoderChain {
    pub fn new(providers: Vec<Box<dyn GeocodingProvider>>) -> Self {
        Self { providers }
    }

    /// Kakao first (when compiled in), then Nominatim.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut providers: Vec<Box<dyn GeocodingProvider>> = Vec::new();

        #[cfg(feature = "kakao")]
        providers.push(Box::new(KakaoProvider::from_config(&config.kakao)?));

        providers.push(Box::new(NominatimProvider::from_config(&config.nominatim)?));

        Ok(Self::new(providers))
    }

    /// Provider names in the order they are tried.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Resolve `coordinates`, degrading to [`ResolvedAddress::placeholder`].
    pub async fn reverse_geocode(&self, coordinates: Coordinates) -> ResolvedAddress {
        for provider in &self.providers {
            if !provider.is_available() {
                log::debug!("Skipping geocoder {}: not configured", provider.name());
                continue;
            }

            match provider.reverse_geocode(coordinates).await {
                Ok(address) => {
                    log::info!(
                        "Geocoder {} resolved ({}, {}) to {} [{}]",
                        provider.name(),
                        coordinates.latitude,
                        coordinates.longitude,
                        address.neighborhood_name,
                        address.full_address_text
                    );
                    return address;
                }
                Err(e) => {
                    log::warn!("Geocoder {} failed: {}", provider.name(), e);
                }
            }
        }

        log::warn!("All geocoders failed; using placeholder neighborhood");
        ResolvedAddress::placeholder()
    }
}
