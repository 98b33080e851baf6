//! Provider-facing lookup request, staging record, and adapter interface.

use crate::error::ProviderError;
use async_trait::async_trait;
use serendigo_rs_protocol::{DetourType, Parking, SuggestionSource};

/// One lookup issued to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub lat: f64,
    pub lng: f64,
    pub radius_m: u32,
    pub detour_type: DetourType,
    /// Free-text hints, forwarded in order.
    pub keywords: Vec<String>,
}

impl LookupRequest {
    /// Keywords joined by a single space, or `None` when there are none.
    pub fn keyword_text(&self) -> Option<String> {
        let words: Vec<&str> = self
            .keywords
            .iter()
            .map(|word| word.trim())
            .filter(|word| !word.is_empty())
            .collect();
        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    }
}

/// A partially normalized place as returned by an adapter.
///
/// Distance, duration, and source may be missing; the search engine fills
/// them before shaping the final suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub name: String,
    pub description: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub distance_km: Option<f64>,
    pub duration_min: Option<u32>,
    pub rating: Option<f64>,
    pub open_now: Option<bool>,
    pub opening_hours: Option<String>,
    pub parking: Option<Parking>,
    pub source: Option<SuggestionSource>,
    pub url: Option<String>,
    pub photo_url: Option<String>,
}

impl PlaceCandidate {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            lat,
            lng,
            distance_km: None,
            duration_min: None,
            rating: None,
            open_now: None,
            opening_hours: None,
            parking: None,
            source: None,
            url: None,
            photo_url: None,
        }
    }

    pub fn with_source(mut self, source: SuggestionSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An external place source.
///
/// "No results" is `Ok(vec![])`; `Err` is reserved for transport, auth, and
/// decode failures.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Tag written onto candidates from this provider.
    fn source(&self) -> SuggestionSource;

    async fn lookup(&self, request: &LookupRequest) -> Result<Vec<PlaceCandidate>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keyword_text_skips_blank_entries() {
        let request = LookupRequest {
            lat: 0.0,
            lng: 0.0,
            radius_m: 500,
            detour_type: DetourType::Food,
            keywords: vec!["ramen".into(), " ".into(), "curry".into()],
        };
        assert_eq!(request.keyword_text().as_deref(), Some("ramen curry"));

        let empty = LookupRequest {
            keywords: Vec::new(),
            ..request
        };
        assert_eq!(empty.keyword_text(), None);
    }
}
