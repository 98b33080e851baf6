//! Search request model and its validation rules.

use crate::{DetourType, TravelMode, ValidationError};
use serde::{Deserialize, Serialize};

/// Smallest accepted travel-time budget in minutes.
pub const MIN_MINUTES: u32 = 1;
/// Largest accepted travel-time budget in minutes.
pub const MAX_MINUTES: u32 = 120;
/// Smallest accepted explicit radius in meters.
pub const MIN_RADIUS_M: u32 = 100;
/// Largest accepted explicit radius in meters.
pub const MAX_RADIUS_M: u32 = 10_000;

/// One detour search request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchQuery {
    pub lat: f64,
    pub lng: f64,
    /// Travel-time budget in minutes.
    pub minutes: u32,
    pub mode: TravelMode,
    pub detour_type: DetourType,
    /// Free-text keywords forwarded to providers, in order.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Explicit search radius in meters; wins over the time-derived radius.
    #[serde(default)]
    pub radius_m: Option<u32>,
    /// Drop well-known chain brands.
    #[serde(default)]
    pub local_only: bool,
    /// Serve only from persisted history, skipping every provider.
    #[serde(default)]
    pub history_only: bool,
    /// Accepted but not used by ranking yet.
    #[serde(default)]
    pub exclude_ids: Vec<String>,
    /// Accepted but not used by ranking yet.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SearchQuery {
    pub fn new(
        lat: f64,
        lng: f64,
        minutes: u32,
        mode: TravelMode,
        detour_type: DetourType,
    ) -> Self {
        Self {
            lat,
            lng,
            minutes,
            mode,
            detour_type,
            categories: Vec::new(),
            radius_m: None,
            local_only: false,
            history_only: false,
            exclude_ids: Vec::new(),
            seed: None,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_radius_m(mut self, radius_m: u32) -> Self {
        self.radius_m = Some(radius_m);
        self
    }

    pub fn local_only(mut self, local_only: bool) -> Self {
        self.local_only = local_only;
        self
    }

    pub fn history_only(mut self, history_only: bool) -> Self {
        self.history_only = history_only;
        self
    }

    /// Check every range constraint of the request.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_coordinates(self.lat, self.lng)?;
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&self.minutes) {
            return Err(ValidationError::out_of_range(
                "minutes",
                self.minutes,
                MIN_MINUTES,
                MAX_MINUTES,
            ));
        }
        if let Some(radius_m) = self.radius_m {
            if !(MIN_RADIUS_M..=MAX_RADIUS_M).contains(&radius_m) {
                return Err(ValidationError::out_of_range(
                    "radius_m",
                    radius_m,
                    MIN_RADIUS_M,
                    MAX_RADIUS_M,
                ));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::out_of_range("lat", lat, -90.0, 90.0));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(ValidationError::out_of_range("lng", lng, -180.0, 180.0));
    }
    Ok(())
}
