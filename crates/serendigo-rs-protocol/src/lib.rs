//! Wire types shared by the Serendigo search engine, store, and HTTP surface.

mod destination;
mod error;
mod guide;
mod place;
mod query;

pub use destination::{
    DEFAULT_DESTINATION_LIMIT, Destination, MAX_DESTINATION_LIMIT, NewDestination,
};
pub use error::ValidationError;
pub use guide::{Audience, GuideMedia, GuideRequest, GuideResponse, GuideStyle};
pub use place::{DEFAULT_PREDICTION_LIMIT, MAX_PREDICTION_LIMIT, PlaceDetails, PlacePrediction};
pub use query::{
    MAX_MINUTES, MAX_RADIUS_M, MIN_MINUTES, MIN_RADIUS_M, SearchQuery,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a persisted history row.
pub type HistoryId = i64;

/// How the traveller moves between origin and detour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walk,
    Drive,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walk => "walk",
            TravelMode::Drive => "drive",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "walk" => Ok(TravelMode::Walk),
            "drive" => Ok(TravelMode::Drive),
            other => Err(ValidationError::InvalidField {
                field: "mode",
                message: format!("expected walk or drive, got {other:?}"),
            }),
        }
    }
}

/// Kind of side trip the traveller is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetourType {
    Food,
    Event,
    Souvenir,
    Spot,
}

impl DetourType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetourType::Food => "food",
            DetourType::Event => "event",
            DetourType::Souvenir => "souvenir",
            DetourType::Spot => "spot",
        }
    }
}

impl fmt::Display for DetourType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetourType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "food" => Ok(DetourType::Food),
            "event" => Ok(DetourType::Event),
            "souvenir" => Ok(DetourType::Souvenir),
            "spot" => Ok(DetourType::Spot),
            other => Err(ValidationError::InvalidField {
                field: "detour_type",
                message: format!("expected food, event, souvenir or spot, got {other:?}"),
            }),
        }
    }
}

/// Upstream that produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// Generic places lookup.
    Google,
    /// Food-specific lookup.
    Hotpepper,
    /// Event lookup.
    Connpass,
    /// Previously chosen detours.
    Local,
}

impl SuggestionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionSource::Google => "google",
            SuggestionSource::Hotpepper => "hotpepper",
            SuggestionSource::Connpass => "connpass",
            SuggestionSource::Local => "local",
        }
    }
}

impl fmt::Display for SuggestionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parking availability reported by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parking {
    Available,
    None,
    Unknown,
}

/// A normalized search result returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    /// Opaque per-response identifier.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub distance_km: f64,
    pub duration_min: u32,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub parking: Option<Parking>,
    pub source: SuggestionSource,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Response generation time, or the original choice time for history results.
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub eta_text: Option<String>,
    pub detour_type: DetourType,
}

/// The subset of a suggestion that is kept when a traveller picks it.
///
/// Unknown fields are ignored, so a full `Suggestion` body deserializes into
/// this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChosenDetour {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl ChosenDetour {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "name",
                message: "must not be empty".to_string(),
            });
        }
        query::validate_coordinates(self.lat, self.lng)
    }
}

impl From<&Suggestion> for ChosenDetour {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            name: suggestion.name.clone(),
            lat: suggestion.lat,
            lng: suggestion.lng,
            description: suggestion.description.clone(),
        }
    }
}

/// A persisted choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub id: HistoryId,
    pub detour_type: DetourType,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Server-assigned persistence time.
    pub chosen_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn enums_round_trip_as_snake_case_strings() {
        assert_eq!(json!(TravelMode::Drive), json!("drive"));
        assert_eq!(json!(DetourType::Souvenir), json!("souvenir"));
        assert_eq!(json!(SuggestionSource::Hotpepper), json!("hotpepper"));
        assert_eq!("spot".parse::<DetourType>().expect("parse"), DetourType::Spot);
    }

    #[test]
    fn unknown_mode_is_a_validation_error() {
        let err = "bike".parse::<TravelMode>().unwrap_err();
        assert!(err.to_string().contains("mode"));
    }

    #[test]
    fn chosen_detour_accepts_full_suggestion_body() {
        let body = json!({
            "id": "abc",
            "name": "地元カフェ",
            "description": "quiet corner",
            "lat": 35.0,
            "lng": 139.0,
            "distance_km": 0.4,
            "duration_min": 5,
            "source": "google",
            "created_at": "2026-01-01T00:00:00Z",
            "detour_type": "food"
        });
        let chosen: ChosenDetour = serde_json::from_value(body).expect("chosen");
        assert_eq!(chosen.name, "地元カフェ");
        assert_eq!(chosen.description.as_deref(), Some("quiet corner"));
        chosen.validate().expect("valid");
    }

    #[test]
    fn chosen_detour_rejects_blank_name() {
        let chosen = ChosenDetour {
            name: "  ".to_string(),
            lat: 0.0,
            lng: 0.0,
            description: None,
        };
        assert!(chosen.validate().is_err());
    }
}
