//! Place lookup results used to pick a destination before saving it.

use serde::{Deserialize, Serialize};

/// Predictions returned when no limit is given.
pub const DEFAULT_PREDICTION_LIMIT: usize = 3;
/// Largest prediction list.
pub const MAX_PREDICTION_LIMIT: usize = 10;

/// One autocomplete suggestion for free-text input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacePrediction {
    pub description: String,
    pub place_id: String,
}

/// Resolved place, shaped so it can be posted as a new destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewDestination;
    use pretty_assertions::assert_eq;

    #[test]
    fn details_body_is_a_valid_destination() {
        let details = PlaceDetails {
            place_id: "mock_kiyomizu".into(),
            name: "清水寺".into(),
            address: "京都府京都市東山区清水".into(),
            lat: 34.994856,
            lng: 135.785046,
        };
        let value = serde_json::to_value(&details).expect("json");
        let destination: NewDestination = serde_json::from_value(value).expect("destination");
        destination.validate().expect("valid");
        assert_eq!(destination.place_id, "mock_kiyomizu");
        assert_eq!(destination.address, "京都府京都市東山区清水");
    }
}
