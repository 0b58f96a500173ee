//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Coordinates, PositionOptions};

/// Environment variable that overrides `kakao.api_key`.
pub const KAKAO_API_KEY_ENV: &str = "KAKAO_REST_API_KEY";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Position request settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,

    /// Kakao Local API (optional provider)
    #[serde(default)]
    pub kakao: KakaoConfig,

    /// OpenStreetMap Nominatim (fallback provider)
    #[serde(default)]
    pub nominatim: NominatimConfig,

    /// Where the selection is persisted
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config.with_env_overrides())
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default().with_env_overrides()
        })
    }

    /// Apply `KAKAO_REST_API_KEY` over `kakao.api_key`.
    pub fn with_env_overrides(self) -> Self {
        self.with_kakao_key_override(std::env::var(KAKAO_API_KEY_ENV).ok())
    }

    fn with_kakao_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|key| !key.trim().is_empty()) {
            self.kakao.api_key = Some(key);
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.geolocation.timeout_ms == 0 {
            return Err(AppError::validation("geolocation.timeout_ms must be > 0"));
        }
        match (self.geolocation.latitude, self.geolocation.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).validate()?,
            (None, None) => {}
            _ => {
                return Err(AppError::validation(
                    "geolocation.latitude and geolocation.longitude must be set together",
                ));
            }
        }

        Url::parse(&self.kakao.base_url)
            .map_err(|e| AppError::validation(format!("kakao.base_url: {e}")))?;
        if self.kakao.timeout_secs == 0 {
            return Err(AppError::validation("kakao.timeout_secs must be > 0"));
        }

        Url::parse(&self.nominatim.base_url)
            .map_err(|e| AppError::validation(format!("nominatim.base_url: {e}")))?;
        if self.nominatim.user_agent.trim().is_empty() {
            return Err(AppError::validation("nominatim.user_agent is empty"));
        }
        if self.nominatim.timeout_secs == 0 {
            return Err(AppError::validation("nominatim.timeout_secs must be > 0"));
        }

        if self.storage.dir.as_os_str().is_empty() {
            return Err(AppError::validation("storage.dir is empty"));
        }
        Ok(())
    }
}

/// One-shot position request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default = "defaults::enable_high_accuracy")]
    pub enable_high_accuracy: bool,

    /// Give up on the position request after this many milliseconds
    #[serde(default = "defaults::geolocation_timeout")]
    pub timeout_ms: u64,

    /// Oldest cached fix accepted, in milliseconds (0 = always fresh)
    #[serde(default)]
    pub maximum_age_ms: u64,

    /// Fixed device latitude, used when no position is given on the command line
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Fixed device longitude
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl GeolocationConfig {
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            enable_high_accuracy: self.enable_high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            maximum_age: Duration::from_millis(self.maximum_age_ms),
        }
    }

    /// The configured fixed position, if both halves are present.
    pub fn fixed_coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enable_high_accuracy: defaults::enable_high_accuracy(),
            timeout_ms: defaults::geolocation_timeout(),
            maximum_age_ms: 0,
            latitude: None,
            longitude: None,
        }
    }
}

/// Kakao Local API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KakaoConfig {
    /// REST API key; the provider is skipped without one
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "defaults::kakao_base_url")]
    pub base_url: String,

    #[serde(default = "defaults::http_timeout")]
    pub timeout_secs: u64,
}

impl KakaoConfig {
    /// Trimmed API key, `None` when unset or blank.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .as_deref()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl Default for KakaoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::kakao_base_url(),
            timeout_secs: defaults::http_timeout(),
        }
    }
}

/// Nominatim reverse geocoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    #[serde(default = "defaults::nominatim_base_url")]
    pub base_url: String,

    /// Nominatim's usage policy requires an identifying User-Agent
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    #[serde(default = "defaults::http_timeout")]
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::nominatim_base_url(),
            user_agent: defaults::user_agent(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::http_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Geolocation defaults
    pub fn enable_high_accuracy() -> bool {
        true
    }
    pub fn geolocation_timeout() -> u64 {
        10_000
    }

    // Provider defaults
    pub fn kakao_base_url() -> String {
        "https://dapi.kakao.com".into()
    }
    pub fn nominatim_base_url() -> String {
        "https://nominatim.openstreetmap.org".into()
    }
    pub fn user_agent() -> String {
        "MyMarketApp/1.0".into()
    }
    pub fn accept_language() -> String {
        "ko".into()
    }
    pub fn http_timeout() -> u64 {
        10
    }

    pub fn storage_dir() -> PathBuf {
        PathBuf::from("storage")
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
