// src/services/kakao.rs

//! Kakao Local REST API.
//!
//! Only used when a REST API key is configured. Requests carry
//! `Authorization: KakaoAK {key}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Coordinates, KakaoConfig, ResolvedAddress};
use crate::utils::http;

use super::GeocodingProvider;

const PROVIDER: &str = "kakao";
const USER_AGENT: &str = concat!("dongne/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct Documents<T> {
    #[serde(default = "Vec::new")]
    documents: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Coord2AddressDocument {
    address: Option<KakaoAddress>,
}

/// Lot-number address block of a `coord2address` document.
#[derive(Debug, Default, Deserialize)]
struct KakaoAddress {
    #[serde(default)]
    address_name: String,
    #[serde(default)]
    region_1depth_name: String,
    #[serde(default)]
    region_2depth_name: String,
    #[serde(default)]
    region_3depth_name: String,
}

impl From<KakaoAddress> for ResolvedAddress {
    fn from(address: KakaoAddress) -> Self {
        let neighborhood_name = if address.region_3depth_name.trim().is_empty() {
            address.region_2depth_name.clone()
        } else {
            address.region_3depth_name
        };
        Self {
            neighborhood_name,
            district_name: address.region_2depth_name,
            city_name: address.region_1depth_name,
            full_address_text: address.address_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddressSearchDocument {
    /// Longitude, string encoded
    x: String,
    /// Latitude, string encoded
    y: String,
}

/// Kakao Local API client.
pub struct KakaoProvider {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl KakaoProvider {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: http::parse_base_url(base_url)?,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn from_config(config: &KakaoConfig) -> Result<Self> {
        let client = http::create_async_client(USER_AGENT, config.timeout_secs)?;
        Self::new(client, &config.base_url, config.resolved_api_key())
    }

    fn authorization(&self) -> Result<String> {
        self.api_key
            .as_deref()
            .map(|key| format!("KakaoAK {key}"))
            .ok_or_else(|| AppError::config("Kakao API key is not configured"))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>> {
        log::debug!("GET {}", url);
        let request = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.authorization()?);
        let body: Documents<T> = http::fetch_json(request, PROVIDER).await?;
        Ok(body.documents)
    }

    /// Reverse geocode through `/v2/local/geo/coord2address.json`.
    pub async fn coordinates_to_address(&self, coordinates: Coordinates) -> Result<ResolvedAddress> {
        let mut url = self.base_url.join("v2/local/geo/coord2address.json")?;
        url.query_pairs_mut()
            .append_pair("x", &coordinates.longitude.to_string())
            .append_pair("y", &coordinates.latitude.to_string());

        let documents: Vec<Coord2AddressDocument> = self.get(url).await?;
        documents
            .into_iter()
            .next()
            .and_then(|doc| doc.address)
            .map(ResolvedAddress::from)
            .ok_or_else(|| AppError::geocoding(PROVIDER, "no address for coordinates"))
    }

    /// Forward geocode a free-form address through `/v2/local/search/address.json`.
    pub async fn address_to_coordinates(&self, query: &str) -> Result<Coordinates> {
        let mut url = self.base_url.join("v2/local/search/address.json")?;
        url.query_pairs_mut().append_pair("query", query);

        let documents: Vec<AddressSearchDocument> = self.get(url).await?;
        let doc = documents
            .into_iter()
            .next()
            .ok_or_else(|| AppError::geocoding(PROVIDER, format!("no match for '{query}'")))?;

        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| AppError::geocoding(PROVIDER, format!("bad coordinate '{value}': {e}")))
        };
        Ok(Coordinates::new(parse(&doc.y)?, parse(&doc.x)?))
    }
}

#[async_trait]
impl GeocodingProvider for KakaoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<ResolvedAddress> {
        self.coordinates_to_address(coordinates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::serve_once;

    fn provider(base_url: &str, api_key: Option<&str>) -> KakaoProvider {
        let client = http::create_async_client(USER_AGENT, 5).unwrap();
        KakaoProvider::new(client, base_url, api_key.map(str::to_string)).unwrap()
    }

    #[test]
    fn test_availability_follows_key() {
        assert!(!provider("https://dapi.kakao.com", None).is_available());
        assert!(!provider("https://dapi.kakao.com", Some("  ")).is_available());
        assert!(provider("https://dapi.kakao.com", Some("abc")).is_available());
    }

    #[test]
    fn test_region_3depth_falls_back_to_region_2depth() {
        let address = KakaoAddress {
            address_name: "경기 하남시".to_string(),
            region_1depth_name: "경기".to_string(),
            region_2depth_name: "하남시".to_string(),
            region_3depth_name: String::new(),
        };
        let resolved = ResolvedAddress::from(address);
        assert_eq!(resolved.neighborhood_name, "하남시");
        assert_eq!(resolved.district_name, "하남시");
        assert_eq!(resolved.city_name, "경기");
    }

    #[tokio::test]
    async fn test_coordinates_to_address() {
        let body = r#"{
            "meta": { "total_count": 1 },
            "documents": [{
                "road_address": null,
                "address": {
                    "address_name": "서울 강남구 역삼동 737",
                    "region_1depth_name": "서울",
                    "region_2depth_name": "강남구",
                    "region_3depth_name": "역삼동"
                }
            }]
        }"#;
        let (base_url, request) = serve_once(200, body).await;

        let address = provider(&base_url, Some("secret"))
            .coordinates_to_address(Coordinates::new(37.5, 127.03))
            .await
            .unwrap();
        assert_eq!(address.neighborhood_name, "역삼동");
        assert_eq!(address.district_name, "강남구");
        assert_eq!(address.full_address_text, "서울 강남구 역삼동 737");

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /v2/local/geo/coord2address.json?x=127.03&y=37.5"));
        assert!(request.contains("authorization: kakaoak secret"));
    }

    #[tokio::test]
    async fn test_empty_documents_is_a_failure() {
        let (base_url, _request) = serve_once(200, r#"{"documents": []}"#).await;
        let result = provider(&base_url, Some("secret"))
            .reverse_geocode(Coordinates::new(0.0, 0.0))
            .await;
        assert!(matches!(result, Err(AppError::Geocoding { .. })));
    }

    #[tokio::test]
    async fn test_unauthorized_is_a_failure() {
        let (base_url, _request) = serve_once(401, r#"{"errorType":"AccessDeniedError"}"#).await;
        let result = provider(&base_url, Some("wrong"))
            .reverse_geocode(Coordinates::new(37.5, 127.0))
            .await;
        assert!(matches!(result, Err(AppError::Geocoding { .. })));
    }

    #[tokio::test]
    async fn test_address_to_coordinates() {
        let body = r#"{"documents": [{ "address_name": "경기 하남시 신장동", "x": "127.2145", "y": "37.5434" }]}"#;
        let (base_url, _request) = serve_once(200, body).await;

        let coordinates = provider(&base_url, Some("secret"))
            .address_to_coordinates("하남시 신장동")
            .await
            .unwrap();
        assert_eq!(coordinates, Coordinates::new(37.5434, 127.2145));
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let body = r#"{"documents": [{"x": "127.0276", "y": "37.4979"}]}"#;
        let (base_url, request) = serve_once(200, body).await;

        provider(&format!("{base_url}/kakao"), Some("secret"))
            .address_to_coordinates("역삼동")
            .await
            .unwrap();

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /kakao/v2/local/search/address.json?"));
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() {
        let result = provider("http://127.0.0.1:9", None)
            .address_to_coordinates("역삼동")
            .await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
