//! Service layer for the location resolver.
//!
//! This module contains:
//! - Position acquisition (`LocationSource`)
//! - The reverse geocoding provider chain (`GeocodingProvider`, `GeocoderChain`)
//! - Kakao Local and Nominatim providers

mod geocoding;
#[cfg(feature = "kakao")]
mod kakao;
mod nominatim;
mod position;

pub use geocoding::{GeocoderChain, GeocodingProvider};
#[cfg(feature = "kakao")]
pub use kakao::KakaoProvider;
pub use nominatim::{
    NominatimAddress, NominatimProvider, extract_city, extract_district, extract_neighborhood,
};
pub use position::{FixedLocation, LocationSource, NoLocationSource};
