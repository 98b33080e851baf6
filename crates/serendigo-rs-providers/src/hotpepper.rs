//! HotPepper gourmet search adapter (food only).

use crate::candidate::{LookupRequest, PlaceCandidate, PlaceProvider};
use crate::error::ProviderError;
use crate::http::{build_client, fetch_json};
use crate::json::{lenient_f64, non_empty};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use serendigo_rs_config::ProvidersConfig;
use serendigo_rs_protocol::{Parking, SuggestionSource};
use std::time::Duration;

const RESULT_COUNT: u32 = 30;

/// Snap a radius in meters up to the provider's fixed range code.
pub fn range_code(radius_m: u32) -> u8 {
    match radius_m {
        0..=300 => 1,
        301..=500 => 2,
        501..=1000 => 3,
        1001..=2000 => 4,
        _ => 5,
    }
}

/// Classify the free-text parking field.
pub fn parse_parking(text: &str) -> Parking {
    let text = text.trim();
    if text.starts_with("あり") {
        Parking::Available
    } else if text.starts_with("なし") {
        Parking::None
    } else {
        Parking::Unknown
    }
}

#[derive(Clone)]
pub struct HotPepper {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl HotPepper {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_key = non_empty(api_key);
        if api_key.is_none() {
            debug!("provider disabled (source=hotpepper, reason=missing api key)");
        }
        Ok(Self {
            client: build_client(timeout, "serendigo")?,
            api_key,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &ProvidersConfig) -> Result<Self, ProviderError> {
        Self::new(
            config.hotpepper.api_key.clone(),
            config.hotpepper.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl PlaceProvider for HotPepper {
    fn source(&self) -> SuggestionSource {
        SuggestionSource::Hotpepper
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<Vec<PlaceCandidate>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };
        let mut params: Vec<(&str, String)> = vec![
            ("key", api_key.to_string()),
            ("lat", request.lat.to_string()),
            ("lng", request.lng.to_string()),
            ("range", range_code(request.radius_m).to_string()),
            ("format", "json".to_string()),
            ("count", RESULT_COUNT.to_string()),
        ];
        if let Some(keyword) = request.keyword_text() {
            params.push(("keyword", keyword));
        }
        let body: Value = fetch_json(self.client.get(&self.base_url).query(&params)).await?;
        parse_shops(&body)
    }
}

/// Map a gourmet-search payload to candidates.
///
/// Shops without usable coordinates are dropped.
pub fn parse_shops(body: &Value) -> Result<Vec<PlaceCandidate>, ProviderError> {
    let Some(results) = body.get("results").and_then(Value::as_object) else {
        return Ok(Vec::new());
    };
    if let Some(message) = results
        .get("error")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
    {
        return Err(ProviderError::Unavailable(format!("hotpepper: {message}")));
    }
    let shops = results
        .get("shop")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let text = |shop: &Value, key: &str| non_empty(shop.get(key).and_then(Value::as_str).map(str::to_string));

    let candidates = shops
        .iter()
        .filter_map(|shop| {
            let name = text(shop, "name")?;
            let lat = lenient_f64(shop.get("lat"))?;
            let lng = lenient_f64(shop.get("lng"))?;
            let mut candidate =
                PlaceCandidate::new(name, lat, lng).with_source(SuggestionSource::Hotpepper);
            candidate.description = text(shop, "address");
            candidate.opening_hours = text(shop, "open");
            candidate.parking = text(shop, "parking").map(|raw| parse_parking(&raw));
            candidate.url = shop
                .pointer("/urls/pc")
                .and_then(Value::as_str)
                .map(str::to_string);
            candidate.photo_url = shop
                .pointer("/photo/pc/l")
                .and_then(Value::as_str)
                .map(str::to_string);
            Some(candidate)
        })
        .collect();
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn range_codes_snap_upward() {
        assert_eq!(range_code(100), 1);
        assert_eq!(range_code(300), 1);
        assert_eq!(range_code(301), 2);
        assert_eq!(range_code(1000), 3);
        assert_eq!(range_code(1200), 4);
        assert_eq!(range_code(2000), 4);
        assert_eq!(range_code(2001), 5);
        assert_eq!(range_code(10_000), 5);
    }

    #[test]
    fn parking_text_is_classified() {
        assert_eq!(parse_parking("あり ：10台"), Parking::Available);
        assert_eq!(parse_parking("なし ：近隣にコインパーキングあり"), Parking::None);
        assert_eq!(parse_parking("お問い合わせください"), Parking::Unknown);
    }

    #[test]
    fn maps_shops_and_drops_missing_coordinates() {
        let body = json!({
            "results": {
                "shop": [
                    {
                        "name": "炭火焼 たなか",
                        "address": "東京都千代田区丸の内1",
                        "lat": "35.6812",
                        "lng": 139.7671,
                        "open": "月～金: 17:00～23:00",
                        "parking": "なし ：近隣にあり",
                        "urls": { "pc": "https://www.hotpepper.jp/strJ0001/" },
                        "photo": { "pc": { "l": "https://imgfp.hotp.jp/l.jpg" } }
                    },
                    { "name": "no coords", "lat": "", "lng": "" }
                ]
            }
        });
        let candidates = parse_shops(&body).expect("parse");
        assert_eq!(candidates.len(), 1);
        let shop = &candidates[0];
        assert_eq!(shop.name, "炭火焼 たなか");
        assert_eq!(shop.lat, 35.6812);
        assert_eq!(shop.parking, Some(Parking::None));
        assert_eq!(shop.opening_hours.as_deref(), Some("月～金: 17:00～23:00"));
        assert_eq!(shop.url.as_deref(), Some("https://www.hotpepper.jp/strJ0001/"));
        assert_eq!(shop.photo_url.as_deref(), Some("https://imgfp.hotp.jp/l.jpg"));
        assert_eq!(shop.rating, None);
        assert_eq!(shop.source, Some(SuggestionSource::Hotpepper));
    }

    #[test]
    fn api_error_is_unavailable() {
        let body = json!({ "results": { "error": [ { "message": "APIキーまたはIPアドレスの認証エラーです", "code": 2000 } ] } });
        assert!(matches!(parse_shops(&body), Err(ProviderError::Unavailable(_))));
    }

    #[test]
    fn missing_results_is_empty() {
        assert!(parse_shops(&json!({})).expect("parse").is_empty());
    }
}
