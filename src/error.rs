// src/error.rs

//! Unified error handling for the location resolver.

use std::fmt;

use thiserror::Error;

/// Result type alias for resolver operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// The runtime exposes no geolocation capability
    #[error("Geolocation is not supported")]
    Unsupported,

    /// Permission denied, timeout or a stale fix
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// A single geocoding provider failed
    #[error("Geocoding error from {provider}: {message}")]
    Geocoding { provider: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a location-unavailable error.
    pub fn location_unavailable(message: impl fmt::Display) -> Self {
        Self::LocationUnavailable(message.to_string())
    }

    /// Create a provider-level geocoding error.
    pub fn geocoding(provider: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Geocoding {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Alert text for the failures a user is expected to see.
    ///
    /// Everything else is logged and absorbed, so this returns `None`.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::Unsupported => Some("위치 정보를 사용할 수 없는 환경입니다."),
            Self::LocationUnavailable(_) => {
                Some("위치 정보를 가져올 수 없습니다. 위치 권한을 확인해주세요.")
            }
            _ => None,
        }
    }
}
