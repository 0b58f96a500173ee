// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Parse a provider base URL so that relative endpoints land under its path.
///
/// `https://geo.example.com/nominatim` becomes `https://geo.example.com/nominatim/`.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Send a request and decode a JSON body.
///
/// Any non-success status is reported as a geocoding error for `provider`.
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder, provider: &str) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::geocoding(provider, format!("HTTP {status}")));
    }

    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let base = parse_base_url("https://geo.example.com/nominatim").unwrap();
        assert_eq!(base.join("reverse").unwrap().path(), "/nominatim/reverse");

        let base = parse_base_url("https://geo.example.com/nominatim/").unwrap();
        assert_eq!(base.join("reverse").unwrap().path(), "/nominatim/reverse");

        let base = parse_base_url("https://dapi.kakao.com").unwrap();
        assert_eq!(
            base.join("v2/local/search/address.json").unwrap().as_str(),
            "https://dapi.kakao.com/v2/local/search/address.json"
        );
    }
}
