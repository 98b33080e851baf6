//! Google Places adapter: nearby search for detours, plus autocomplete,
//! details, and photos for destination lookup.

use crate::candidate::{LookupRequest, PlaceCandidate, PlaceProvider};
use crate::directory::{
    PlaceDirectory, PlacePhoto, is_photo_reference, photo_route_url, sample_details,
    sample_predictions,
};
use crate::error::ProviderError;
use crate::http::{build_client, fetch_bytes, fetch_json};
use crate::json::non_empty;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serendigo_rs_config::ProvidersConfig;
use serendigo_rs_protocol::{DetourType, PlaceDetails, PlacePrediction, SuggestionSource};
use std::time::Duration;

const MAPS_PLACE_URL: &str = "https://www.google.com/maps/place/?q=place_id:";
const PHOTO_MAX_WIDTH: u32 = 400;
const DETAILS_FIELDS: &str = "place_id,name,formatted_address,geometry";

#[derive(Debug, Deserialize)]
pub(crate) struct NearbyResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<NearbyPlace>,
}

#[derive(Debug, Deserialize)]
struct NearbyPlace {
    name: Option<String>,
    vicinity: Option<String>,
    geometry: Option<Geometry>,
    rating: Option<f64>,
    opening_hours: Option<OpeningHours>,
    place_id: Option<String>,
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    photo_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    predictions: Vec<AutocompletePrediction>,
}

#[derive(Debug, Deserialize)]
struct AutocompletePrediction {
    description: Option<String>,
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    place_id: Option<String>,
    name: Option<String>,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
}

/// Fail on any status other than OK or one of `empty`, which maps to no data.
fn check_status(
    status: Option<&str>,
    error_message: Option<String>,
    empty: &[&str],
) -> Result<bool, ProviderError> {
    match status {
        None | Some("OK") => Ok(true),
        Some(status) if empty.contains(&status) => Ok(false),
        Some(status) => {
            let detail = error_message.unwrap_or_default();
            Err(ProviderError::Unavailable(format!("google status {status} {detail}")))
        }
    }
}

/// Place type sent for each detour type.
pub fn place_type(detour_type: DetourType) -> Option<&'static str> {
    match detour_type {
        DetourType::Food => Some("restaurant"),
        DetourType::Souvenir => Some("store"),
        DetourType::Spot => Some("tourist_attraction"),
        DetourType::Event => None,
    }
}

/// Generic places lookup backed by the Places nearby-search endpoint.
#[derive(Clone)]
pub struct GooglePlaces {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
}

impl GooglePlaces {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_key = non_empty(api_key);
        if api_key.is_none() {
            debug!("provider disabled (source=google, reason=missing api key)");
        }
        Ok(Self {
            client: build_client(timeout, "serendigo")?,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: language.into(),
        })
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        Self::new(
            config.google.api_key.clone(),
            config.google.base_url.clone(),
            config.language.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl PlaceProvider for GooglePlaces {
    fn source(&self) -> SuggestionSource {
        SuggestionSource::Google
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        let mut params: Vec<(&str, String)> = vec![
            ("location", format!("{},{}", request.lat, request.lng)),
            ("radius", request.radius_m.to_string()),
            ("language", self.language.clone()),
            ("key", api_key.to_string()),
        ];
        if let Some(kind) = place_type(request.detour_type) {
            params.push(("type", kind.to_string()));
        }
        if let Some(keyword) = request.keyword_text() {
            params.push(("keyword", keyword));
        }
        let url = format!("{}/nearbysearch/json", self.base_url);
        let response: NearbyResponse = fetch_json(self.client.get(url).query(&params)).await?;
        parse_nearby(response)
    }
}

#[async_trait]
impl PlaceDirectory for GooglePlaces {
    async fn predictions(
        &self,
        input: &str,
        limit: usize,
    ) -> Result<Vec<PlacePrediction>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(sample_predictions(limit));
        };
        let params = [
            ("input", input.to_string()),
            ("language", self.language.clone()),
            ("key", api_key.to_string()),
        ];
        let url = format!("{}/autocomplete/json", self.base_url);
        let response: AutocompleteResponse =
            fetch_json(self.client.get(url).query(&params)).await?;
        parse_predictions(response, limit)
    }

    async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(sample_details(place_id));
        };
        let params = [
            ("place_id", place_id.to_string()),
            ("fields", DETAILS_FIELDS.to_string()),
            ("language", self.language.clone()),
            ("key", api_key.to_string()),
        ];
        let url = format!("{}/details/json", self.base_url);
        let response: DetailsResponse = fetch_json(self.client.get(url).query(&params)).await?;
        parse_details(response, place_id)
    }

    async fn photo(&self, reference: &str, max_width: u32) -> Result<PlacePhoto, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ProviderError::Unavailable("google api key not configured".into()));
        };
        if !is_photo_reference(reference) {
            return Err(ProviderError::Decode(format!("bad photo reference {reference:?}")));
        }
        let params = [
            ("maxwidth", max_width.to_string()),
            ("photo_reference", reference.to_string()),
            ("key", api_key.to_string()),
        ];
        let url = format!("{}/photo", self.base_url);
        let (content_type, bytes) = fetch_bytes(self.client.get(url).query(&params)).await?;
        debug!("place photo fetched (bytes={})", bytes.len());
        Ok(PlacePhoto {
            content_type: content_type.unwrap_or_else(|| "image/jpeg".to_string()),
            bytes,
        })
    }
}

/// Map a nearby-search payload to candidates.
///
/// Photos point at the server's photo route, so the API key never leaves the
/// server.
pub(crate) fn parse_nearby(response: NearbyResponse) -> Result<Vec<PlaceCandidate>, ProviderError> {
    check_status(
        response.status.as_deref(),
        response.error_message,
        &["ZERO_RESULTS"],
    )?;
    let candidates = response
        .results
        .into_iter()
        .filter_map(|place| {
            let name = non_empty(place.name)?;
            let location = place.geometry?.location;
            let mut candidate = PlaceCandidate::new(name, location.lat, location.lng)
                .with_source(SuggestionSource::Google);
            candidate.description = non_empty(place.vicinity);
            candidate.rating = place.rating;
            candidate.open_now = place.opening_hours.and_then(|hours| hours.open_now);
            candidate.url = place.place_id.map(|id| format!("{MAPS_PLACE_URL}{id}"));
            candidate.photo_url = place
                .photos
                .into_iter()
                .find_map(|photo| photo.photo_reference)
                .and_then(|reference| photo_route_url(&reference, PHOTO_MAX_WIDTH));
            Some(candidate)
        })
        .collect();
    Ok(candidates)
}

fn parse_predictions(
    response: AutocompleteResponse,
    limit: usize,
) -> Result<Vec<PlacePrediction>, ProviderError> {
    if !check_status(
        response.status.as_deref(),
        response.error_message,
        &["ZERO_RESULTS"],
    )? {
        return Ok(Vec::new());
    }
    Ok(response
        .predictions
        .into_iter()
        .filter_map(|prediction| {
            Some(PlacePrediction {
                description: non_empty(prediction.description)?,
                place_id: non_empty(prediction.place_id)?,
            })
        })
        .take(limit)
        .collect())
}

fn parse_details(
    response: DetailsResponse,
    requested_id: &str,
) -> Result<Option<PlaceDetails>, ProviderError> {
    if !check_status(
        response.status.as_deref(),
        response.error_message,
        &["ZERO_RESULTS", "NOT_FOUND", "INVALID_REQUEST"],
    )? {
        return Ok(None);
    }
    let Some(result) = response.result else {
        return Ok(None);
    };
    let Some(location) = result.geometry.map(|geometry| geometry.location) else {
        return Err(ProviderError::Decode("place details without geometry".into()));
    };
    let name = non_empty(result.name)
        .ok_or_else(|| ProviderError::Decode("place details without name".into()))?;
    Ok(Some(PlaceDetails {
        place_id: non_empty(result.place_id).unwrap_or_else(|| requested_id.to_string()),
        name,
        address: result.formatted_address.unwrap_or_default(),
        lat: location.lat,
        lng: location.lng,
    }))
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|err| ProviderError::Decode(err.to_string()))
}

/// Parse a raw nearby-search body; exposed for fixture tests.
pub fn parse_nearby_json(body: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
    parse_nearby(decode(body)?)
}

/// Parse a raw autocomplete body; exposed for fixture tests.
pub fn parse_predictions_json(
    body: &str,
    limit: usize,
) -> Result<Vec<PlacePrediction>, ProviderError> {
    parse_predictions(decode(body)?, limit)
}

/// Parse a raw details body; exposed for fixture tests.
pub fn parse_details_json(
    body: &str,
    requested_id: &str,
) -> Result<Option<PlaceDetails>, ProviderError> {
    parse_details(decode(body)?, requested_id)
}
