//! Event lookup: reverse-geocode the origin to a locality, then search
//! connpass for events mentioning it.

use crate::candidate::{LookupRequest, PlaceCandidate, PlaceProvider};
use crate::error::ProviderError;
use crate::http::{build_client, fetch_json};
use crate::json::{lenient_f64, non_empty};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use serendigo_rs_config::{EventsConfig, ProvidersConfig};
use serendigo_rs_protocol::SuggestionSource;
use std::sync::Arc;
use std::time::Duration;

/// Address keys checked for a locality, in priority order.
const LOCALITY_KEYS: &[&str] = &["city", "town", "village", "municipality"];

/// Resolves coordinates to a locality name.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn locality(&self, lat: f64, lng: f64) -> Result<Option<String>, ProviderError>;
}

/// Nominatim reverse geocoder.
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    url: String,
    language: String,
}

impl NominatimGeocoder {
    pub fn new(
        url: impl Into<String>,
        user_agent: &str,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout, user_agent)?,
            url: url.into(),
            language: language.into(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn locality(&self, lat: f64, lng: f64) -> Result<Option<String>, ProviderError> {
        let params = [
            ("format", "jsonv2".to_string()),
            ("lat", lat.to_string()),
            ("lon", lng.to_string()),
            ("accept-language", self.language.clone()),
        ];
        let body: Value = fetch_json(self.client.get(&self.url).query(&params)).await?;
        Ok(parse_locality(&body))
    }
}

/// First non-empty locality field of a reverse-geocoding payload.
pub fn parse_locality(body: &Value) -> Option<String> {
    let address = body.get("address")?;
    LOCALITY_KEYS.iter().find_map(|key| {
        address
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Event provider combining a geocoder with the connpass search API.
#[derive(Clone)]
pub struct ConnpassEvents {
    geocoder: Arc<dyn ReverseGeocoder>,
    client: Client,
    search_url: String,
    api_key: Option<String>,
    count: u32,
}

impl ConnpassEvents {
    pub fn new(
        geocoder: Arc<dyn ReverseGeocoder>,
        config: &EventsConfig,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            geocoder,
            client: build_client(timeout, &config.user_agent)?,
            search_url: config.search_url.clone(),
            api_key: non_empty(config.api_key.clone()),
            count: config.count,
        })
    }

    /// Nominatim-backed event provider built from provider settings.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let geocoder = NominatimGeocoder::new(
            config.events.geocoder_url.clone(),
            &config.events.user_agent,
            config.language.clone(),
            timeout,
        )?;
        Self::new(Arc::new(geocoder), &config.events, timeout)
    }

    async fn search(&self, locality: &str) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let params = [
            ("keyword_or", locality.to_string()),
            ("count", self.count.to_string()),
        ];
        let mut request = self.client.get(&self.search_url).query(&params);
        if let Some(api_key) = self.api_key.as_deref() {
            request = request.header("X-API-Key", api_key);
        }
        let body: Value = fetch_json(request).await?;
        Ok(parse_events(&body))
    }
}

#[async_trait]
impl PlaceProvider for ConnpassEvents {
    fn source(&self) -> SuggestionSource {
        SuggestionSource::Connpass
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let Some(locality) = self.geocoder.locality(request.lat, request.lng).await? else {
            debug!(
                "no locality for origin (source=connpass, lat={}, lng={})",
                request.lat, request.lng
            );
            return Ok(Vec::new());
        };
        debug!("searching events (source=connpass, locality={locality})");
        self.search(&locality).await
    }
}

/// Map a connpass event payload to candidates; events without coordinates
/// are dropped.
pub fn parse_events(body: &Value) -> Vec<PlaceCandidate> {
    let Some(events) = body.get("events").and_then(Value::as_array) else {
        return Vec::new();
    };
    let text = |event: &Value, key: &str| {
        non_empty(event.get(key).and_then(Value::as_str).map(str::to_string))
    };
    events
        .iter()
        .filter_map(|event| {
            let name = text(event, "title")?;
            let lat = lenient_f64(event.get("lat"))?;
            let lng = lenient_f64(event.get("lon"))?;
            let mut candidate =
                PlaceCandidate::new(name, lat, lng).with_source(SuggestionSource::Connpass);
            candidate.description = text(event, "catch").or_else(|| text(event, "place"));
            candidate.url = text(event, "event_url");
            candidate.opening_hours = text(event, "started_at");
            Some(candidate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn locality_prefers_city_then_town() {
        let body = json!({ "address": { "town": "軽井沢町", "city": "" , "state": "長野県" } });
        assert_eq!(parse_locality(&body).as_deref(), Some("軽井沢町"));
        let body = json!({ "address": { "city": "千代田区", "town": "丸の内" } });
        assert_eq!(parse_locality(&body).as_deref(), Some("千代田区"));
        assert_eq!(parse_locality(&json!({ "address": { "state": "東京都" } })), None);
        assert_eq!(parse_locality(&json!({ "error": "Unable to geocode" })), None);
    }

    #[test]
    fn maps_events_with_string_or_number_coordinates() {
        let body = json!({
            "events": [
                {
                    "title": "Rust もくもく会",
                    "catch": "みんなで黙々と",
                    "lat": "35.6812",
                    "lon": "139.7671",
                    "event_url": "https://connpass.com/event/1/",
                    "started_at": "2026-10-20T19:00:00+09:00"
                },
                { "title": "オンライン勉強会", "lat": null, "lon": null },
                { "title": "数値座標", "lat": 35.0, "lon": 139.0 }
            ]
        });
        let candidates = parse_events(&body);
        assert_eq!(candidates.len(), 2);
        let first = &candidates[0];
        assert_eq!(first.name, "Rust もくもく会");
        assert_eq!(first.lat, 35.6812);
        assert_eq!(first.lng, 139.7671);
        assert_eq!(first.description.as_deref(), Some("みんなで黙々と"));
        assert_eq!(first.url.as_deref(), Some("https://connpass.com/event/1/"));
        assert_eq!(first.opening_hours.as_deref(), Some("2026-10-20T19:00:00+09:00"));
        assert_eq!(first.source, Some(SuggestionSource::Connpass));
        assert_eq!(first.rating, None);
        assert_eq!(candidates[1].name, "数値座標");
    }

    struct NoLocality;

    #[async_trait]
    impl ReverseGeocoder for NoLocality {
        async fn locality(&self, _lat: f64, _lng: f64) -> Result<Option<String>, ProviderError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn no_locality_contributes_nothing() {
        let events = ConnpassEvents::new(
            Arc::new(NoLocality),
            &EventsConfig {
                search_url: "http://127.0.0.1:9/unreachable".to_string(),
                ..EventsConfig::default()
            },
            Duration::from_secs(1),
        )
        .expect("events");
        let request = LookupRequest {
            lat: 0.0,
            lng: 0.0,
            radius_m: 1000,
            detour_type: serendigo_rs_protocol::DetourType::Event,
            keywords: Vec::new(),
        };
        assert!(events.lookup(&request).await.expect("lookup").is_empty());
    }
}
