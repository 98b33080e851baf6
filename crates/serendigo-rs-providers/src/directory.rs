//! Destination lookup: autocomplete, place details, and photo retrieval.

use crate::error::ProviderError;
use async_trait::async_trait;
use serendigo_rs_protocol::{PlaceDetails, PlacePrediction};

/// Path clients use to fetch a place photo through the server.
pub const PHOTO_ROUTE: &str = "/places/photo";

/// Image bytes with the content type reported upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacePhoto {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait PlaceDirectory: Send + Sync {
    /// Up to `limit` predictions for free-text `input`.
    async fn predictions(
        &self,
        input: &str,
        limit: usize,
    ) -> Result<Vec<PlacePrediction>, ProviderError>;

    /// `None` when the place id is unknown upstream.
    async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ProviderError>;

    async fn photo(&self, reference: &str, max_width: u32) -> Result<PlacePhoto, ProviderError>;
}

/// Photo references are opaque tokens; anything outside this alphabet is refused.
pub fn is_photo_reference(reference: &str) -> bool {
    !reference.is_empty()
        && reference
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_')
}

/// Relative URL that proxies `reference` through [`PHOTO_ROUTE`].
pub fn photo_route_url(reference: &str, max_width: u32) -> Option<String> {
    is_photo_reference(reference)
        .then(|| format!("{PHOTO_ROUTE}?reference={reference}&maxwidth={max_width}"))
}

/// Offline predictions served when no Places key is configured.
pub fn sample_predictions(limit: usize) -> Vec<PlacePrediction> {
    [
        ("清水寺, 京都", "mock_kiyomizu"),
        ("清水寺 成就院", "mock_jojuin"),
        ("清水寺 奥の院", "mock_okunoin"),
    ]
    .into_iter()
    .take(limit)
    .map(|(description, place_id)| PlacePrediction {
        description: description.to_string(),
        place_id: place_id.to_string(),
    })
    .collect()
}

/// Offline details for the sample predictions' primary place.
pub fn sample_details(place_id: &str) -> Option<PlaceDetails> {
    (place_id == "mock_kiyomizu").then(|| PlaceDetails {
        place_id: place_id.to_string(),
        name: "清水寺".to_string(),
        address: "京都府京都市東山区清水".to_string(),
        lat: 34.994856,
        lng: 135.785046,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn photo_reference_alphabet() {
        assert!(is_photo_reference("AUc7tXU-abc_123"));
        assert!(!is_photo_reference(""));
        assert!(!is_photo_reference("a&key=x"));
        assert_eq!(
            photo_route_url("ref-1", 400).as_deref(),
            Some("/places/photo?reference=ref-1&maxwidth=400")
        );
        assert_eq!(photo_route_url("../etc", 400), None);
    }

    #[test]
    fn samples_respect_limit() {
        assert_eq!(sample_predictions(2).len(), 2);
        assert_eq!(sample_predictions(10).len(), 3);
        assert!(sample_details("mock_kiyomizu").is_some());
        assert_eq!(sample_details("elsewhere"), None);
    }
}
