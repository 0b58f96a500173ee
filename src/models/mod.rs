// src/models/mod.rs

//! Domain models for the location resolver.

mod config;
mod location;

// Re-export all public types
pub use config::{
    Config, GeolocationConfig, KAKAO_API_KEY_ENV, KakaoConfig, LoggingConfig, NominatimConfig,
    StorageConfig,
};
pub use location::{Coordinates, Position, PositionOptions, ResolvedAddress, SelectedLocation};
