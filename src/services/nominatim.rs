// src/services/nominatim.rs

//! OpenStreetMap Nominatim reverse geocoding.
//!
//! Keyless, but the usage policy requires an identifying `User-Agent`.
//! Korean `display_name` strings list the smallest unit first
//! (e.g. "신장동, 하남시, 경기도, 대한민국"), which is what the neighborhood
//! extraction relies on.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Coordinates, NominatimConfig, ResolvedAddress};
use crate::neighborhoods::{NEIGHBORHOOD_SUFFIX, UNKNOWN_NEIGHBORHOOD};
use crate::utils::http;

use super::GeocodingProvider;

const PROVIDER: &str = "nominatim";

/// The `address` object of a Nominatim response (only the fields used here).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub village: Option<String>,
    pub town: Option<String>,
    pub hamlet: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub city_district: Option<String>,
    pub state: Option<String>,
    pub province: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    display_name: String,
    address: Option<NominatimAddress>,
}

/// Nominatim `/reverse` client.
pub struct NominatimProvider {
    client: Client,
    base_url: Url,
    accept_language: String,
}

impl NominatimProvider {
    pub fn new(client: Client, base_url: &str, accept_language: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: http::parse_base_url(base_url)?,
            accept_language: accept_language.into(),
        })
    }

    pub fn from_config(config: &NominatimConfig) -> Result<Self> {
        let client = http::create_async_client(&config.user_agent, config.timeout_secs)?;
        Self::new(client, &config.base_url, config.accept_language.clone())
    }

    fn reverse_url(&self, coordinates: Coordinates) -> Result<Url> {
        let mut url = self.base_url.join("reverse")?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &coordinates.latitude.to_string())
            .append_pair("lon", &coordinates.longitude.to_string())
            .append_pair("accept-language", &self.accept_language);
        Ok(url)
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<ResolvedAddress> {
        let url = self.reverse_url(coordinates)?;
        log::debug!("GET {}", url);

        let response: ReverseResponse = http::fetch_json(self.client.get(url), PROVIDER).await?;
        let address = response
            .address
            .ok_or_else(|| AppError::geocoding(PROVIDER, "response has no address"))?;

        Ok(ResolvedAddress {
            neighborhood_name: extract_neighborhood(&response.display_name, &address),
            district_name: extract_district(&response.display_name, &address),
            city_name: extract_city(&address),
            full_address_text: response.display_name,
        })
    }
}

fn display_parts(display_name: &str) -> impl Iterator<Item = &str> {
    display_name.split(',').map(str::trim)
}

fn first_present<'a>(fields: &[&'a Option<String>]) -> Option<&'a str> {
    fields
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .find(|value| !value.trim().is_empty())
}

/// Neighborhood name from a Nominatim answer.
///
/// Precedence: the left-most `display_name` token ending in 동, then
/// suburb, neighbourhood, village, town, hamlet, then [`UNKNOWN_NEIGHBORHOOD`].
pub fn extract_neighborhood(display_name: &str, address: &NominatimAddress) -> String {
    display_parts(display_name)
        .find(|part| part.ends_with(NEIGHBORHOOD_SUFFIX))
        .or_else(|| {
            first_present(&[
                &address.suburb,
                &address.neighbourhood,
                &address.village,
                &address.town,
                &address.hamlet,
            ])
        })
        .unwrap_or(UNKNOWN_NEIGHBORHOOD)
        .to_string()
}

/// District (시/구) name: city, county, city_district, then a 시/구 token.
pub fn extract_district(display_name: &str, address: &NominatimAddress) -> String {
    first_present(&[&address.city, &address.county, &address.city_district])
        .or_else(|| display_parts(display_name).find(|part| part.ends_with(&['시', '구'][..])))
        .unwrap_or_default()
        .to_string()
}

/// Province-level name: state, then province.
pub fn extract_city(address: &NominatimAddress) -> String {
    first_present(&[&address.state, &address.province])
        .unwrap_or_default()
        .to_string()
}
