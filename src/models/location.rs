//! Location data carried through the resolver.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::neighborhoods::{self, PLACEHOLDER_NEIGHBORHOOD};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Reject values outside the WGS84 ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::validation(format!(
                "latitude {} is out of range",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::validation(format!(
                "longitude {} is out of range",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// A single position fix reported by a location source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coordinates: Coordinates,
    /// Accuracy radius in meters as reported by a device backend; only logged here
    pub accuracy_m: Option<f64>,
    /// When the fix was taken
    pub timestamp: DateTime<Utc>,
}

impl Position {
    /// A fix taken right now.
    pub fn fresh(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            accuracy_m: None,
            timestamp: Utc::now(),
        }
    }

    /// Whether this fix satisfies `maximum_age` for a request issued at `requested_at`.
    ///
    /// A zero maximum age only admits fixes taken after the request started.
    pub fn is_fresh_for(&self, requested_at: DateTime<Utc>, maximum_age: Duration) -> bool {
        let Ok(max_age) = chrono::Duration::from_std(maximum_age) else {
            return true;
        };
        match requested_at.checked_sub_signed(max_age) {
            Some(oldest) => self.timestamp >= oldest,
            None => true,
        }
    }
}

/// Options for a one-shot position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Passed through to device backends; fixed sources ignore it
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_millis(10_000),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Address produced by a geocoding provider.
///
/// Only `neighborhood_name` feeds the selection; the rest is diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub neighborhood_name: String,
    pub district_name: String,
    pub city_name: String,
    pub full_address_text: String,
}

impl ResolvedAddress {
    /// Address returned when no provider could answer.
    pub fn placeholder() -> Self {
        Self {
            neighborhood_name: PLACEHOLDER_NEIGHBORHOOD.to_string(),
            district_name: String::new(),
            city_name: String::new(),
            full_address_text: "위치를 가져올 수 없습니다".to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.neighborhood_name == PLACEHOLDER_NEIGHBORHOOD
    }
}

/// The persisted neighborhood selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedLocation {
    pub selected_neighborhood: String,
    pub neighborhood_candidates: Vec<String>,
}

impl SelectedLocation {
    /// Selection for a freshly resolved neighborhood with its nearby list.
    pub fn from_neighborhood(name: impl Into<String>) -> Self {
        let name = name.into();
        let neighborhood_candidates = neighborhoods::nearby_neighborhoods(&name);
        Self {
            selected_neighborhood: name,
            neighborhood_candidates,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.neighborhood_candidates.iter().any(|c| c == name)
    }
}

impl Default for SelectedLocation {
    fn default() -> Self {
        Self {
            selected_neighborhood: PLACEHOLDER_NEIGHBORHOOD.to_string(),
            neighborhood_candidates: neighborhoods::default_candidates(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validate() {
        assert!(Coordinates::new(37.5, 127.03).validate().is_ok());
        assert!(Coordinates::new(91.0, 0.0).validate().is_err());
        assert!(Coordinates::new(0.0, -180.5).validate().is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_from_neighborhood_keeps_selection_in_candidates() {
        let known = SelectedLocation::from_neighborhood("역삼동");
        assert!(known.contains("역삼동"));
        assert_eq!(known.neighborhood_candidates.len(), 5);

        let unknown = SelectedLocation::from_neighborhood("성수동");
        assert_eq!(unknown.neighborhood_candidates, vec!["성수동".to_string()]);
    }

    #[test]
    fn test_zero_maximum_age_rejects_earlier_fix() {
        let requested_at = Utc::now();
        let mut position = Position::fresh(Coordinates::new(37.5, 127.0));
        assert!(position.is_fresh_for(requested_at, Duration::ZERO));

        position.timestamp = requested_at - chrono::Duration::seconds(5);
        assert!(!position.is_fresh_for(requested_at, Duration::ZERO));
        assert!(position.is_fresh_for(requested_at, Duration::from_secs(60)));
    }

    #[test]
    fn test_default_options() {
        let options = PositionOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::ZERO);
    }
}
