//! Detour search: provider fan-out, gap-fill, filtering, ranking, shaping.

use crate::chain::ChainFilter;
use crate::error::SerendigoCoreError;
use crate::geo::{EtaFormat, eta_text, haversine_km, minutes_to_radius_km, proportional_minutes};
use crate::local::nearby_history;
use chrono::Utc;
use futures_util::future::join_all;
use log::{debug, info, warn};
use serendigo_rs_protocol::{DetourType, SearchQuery, Suggestion, SuggestionSource};
use serendigo_rs_providers::{LookupRequest, PlaceCandidate, PlaceProvider, ProviderError};
use serendigo_rs_store::HistoryStore;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Hard cap on suggestions per search.
pub const MAX_SUGGESTIONS: usize = 3;
/// Radius multiplier applied to event and history candidates.
pub const RADIUS_SLACK: f64 = 1.5;
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HISTORY_SCAN_LIMIT: usize = 100;

/// The live sources consulted by a search.
#[derive(Clone)]
pub struct ProviderSet {
    /// Generic places lookup (food, souvenir, spot).
    pub places: Arc<dyn PlaceProvider>,
    /// Food-specific lookup, appended for food searches.
    pub food: Arc<dyn PlaceProvider>,
    /// Event lookup.
    pub events: Arc<dyn PlaceProvider>,
}

/// Effective search radius for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRadius {
    pub km: f64,
    pub meters: u32,
}

impl SearchRadius {
    /// An explicit radius wins over the time-derived one.
    pub fn resolve(query: &SearchQuery) -> Self {
        let km = match query.radius_m {
            Some(radius_m) => f64::from(radius_m) / 1000.0,
            None => minutes_to_radius_km(query.minutes, query.mode),
        };
        let meters = (km * 1000.0).round().clamp(0.0, f64::from(u32::MAX)) as u32;
        Self { km, meters }
    }
}

/// Stateless search engine; safe to share across requests.
#[derive(Clone)]
pub struct DetourEngine {
    providers: ProviderSet,
    history: Arc<dyn HistoryStore>,
    chain_filter: ChainFilter,
    provider_timeout: Duration,
    history_scan_limit: usize,
}

impl DetourEngine {
    pub fn new(
        providers: ProviderSet,
        history: Arc<dyn HistoryStore>,
    ) -> Result<Self, SerendigoCoreError> {
        let chain_filter = ChainFilter::with_default_brands()
            .map_err(|err| SerendigoCoreError::Config(err.to_string()))?;
        Ok(Self {
            providers,
            history,
            chain_filter,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            history_scan_limit: DEFAULT_HISTORY_SCAN_LIMIT,
        })
    }

    pub fn with_chain_filter(mut self, chain_filter: ChainFilter) -> Self {
        self.chain_filter = chain_filter;
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_history_scan_limit(mut self, limit: usize) -> Self {
        self.history_scan_limit = limit.max(1);
        self
    }

    /// Run one search and return at most [`MAX_SUGGESTIONS`] suggestions.
    ///
    /// Only invalid input and history-store failures are errors; provider
    /// failures and timeouts shrink the pool instead.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Suggestion>, SerendigoCoreError> {
        query.validate()?;
        let radius = SearchRadius::resolve(query);

        if query.history_only {
            let records = self.history.recent(self.history_scan_limit).await?;
            let suggestions = nearby_history(&records, query, radius.km);
            info!(
                "history search (mode={}, radius_m={}, scanned={}, returned={})",
                query.mode,
                radius.meters,
                records.len(),
                suggestions.len()
            );
            return Ok(suggestions);
        }

        let request = LookupRequest {
            lat: query.lat,
            lng: query.lng,
            radius_m: radius.meters,
            detour_type: query.detour_type,
            keywords: query.categories.clone(),
        };
        let mut pool = match query.detour_type {
            DetourType::Food => {
                self.gather(&[&self.providers.places, &self.providers.food], &request)
                    .await
            }
            DetourType::Souvenir | DetourType::Spot => {
                self.gather(&[&self.providers.places], &request).await
            }
            DetourType::Event => {
                let events = self.gather(&[&self.providers.events], &request).await;
                nearby_events(events, query, radius.km)
            }
        };
        let pooled = pool.len();

        fill_gaps(&mut pool, query, radius.km);
        if query.local_only {
            pool.retain(|candidate| !self.chain_filter.is_chain_brand(&candidate.name));
        }
        rank(&mut pool);
        pool.truncate(MAX_SUGGESTIONS);
        let suggestions = shape(pool, query);

        info!(
            "detour search (detour_type={}, mode={}, radius_m={}, pool={}, returned={})",
            query.detour_type,
            query.mode,
            radius.meters,
            pooled,
            suggestions.len()
        );
        Ok(suggestions)
    }

    /// Query providers concurrently; results keep provider order.
    async fn gather(
        &self,
        providers: &[&Arc<dyn PlaceProvider>],
        request: &LookupRequest,
    ) -> Vec<PlaceCandidate> {
        let calls = providers
            .iter()
            .map(|provider| self.call_provider(provider, request));
        join_all(calls).await.into_iter().flatten().collect()
    }

    async fn call_provider(
        &self,
        provider: &Arc<dyn PlaceProvider>,
        request: &LookupRequest,
    ) -> Vec<PlaceCandidate> {
        let source = provider.source();
        let outcome = tokio::time::timeout(self.provider_timeout, provider.lookup(request))
            .await
            .unwrap_or(Err(ProviderError::Timeout(self.provider_timeout)));
        match outcome {
            Ok(candidates) => {
                debug!(
                    "provider answered (source={source}, count={})",
                    candidates.len()
                );
                candidates
            }
            Err(err) => {
                warn!("provider failed (source={source}, error={err})");
                Vec::new()
            }
        }
    }
}

/// Event candidates within the slack radius, with distance and duration set
/// and unknown venue details cleared.
fn nearby_events(
    candidates: Vec<PlaceCandidate>,
    query: &SearchQuery,
    radius_km: f64,
) -> Vec<PlaceCandidate> {
    let max_km = radius_km * RADIUS_SLACK;
    candidates
        .into_iter()
        .filter_map(|mut candidate| {
            let distance_km = haversine_km(query.lat, query.lng, candidate.lat, candidate.lng);
            if distance_km > max_km {
                return None;
            }
            candidate.distance_km = Some(distance_km);
            candidate.duration_min = Some(proportional_minutes(distance_km, radius_km, query.minutes));
            candidate.rating = None;
            candidate.open_now = None;
            candidate.parking = None;
            candidate.photo_url = None;
            candidate.source.get_or_insert(SuggestionSource::Connpass);
            Some(candidate)
        })
        .collect()
}

/// Compute distance and duration where a provider left them out.
fn fill_gaps(pool: &mut [PlaceCandidate], query: &SearchQuery, radius_km: f64) {
    for candidate in pool.iter_mut() {
        let (lat, lng) = (candidate.lat, candidate.lng);
        let distance_km = *candidate
            .distance_km
            .get_or_insert_with(|| haversine_km(query.lat, query.lng, lat, lng));
        candidate
            .duration_min
            .get_or_insert_with(|| proportional_minutes(distance_km, radius_km, query.minutes));
    }
}

/// Nearest first; ties go to the higher rating, missing ratings count as 0.
fn rank(pool: &mut [PlaceCandidate]) {
    pool.sort_by(compare_candidates);
}

fn compare_candidates(left: &PlaceCandidate, right: &PlaceCandidate) -> Ordering {
    let distance = |candidate: &PlaceCandidate| candidate.distance_km.unwrap_or(f64::INFINITY);
    let rating = |candidate: &PlaceCandidate| candidate.rating.unwrap_or(0.0);
    distance(left)
        .total_cmp(&distance(right))
        .then_with(|| rating(right).total_cmp(&rating(left)))
}

fn shape(pool: Vec<PlaceCandidate>, query: &SearchQuery) -> Vec<Suggestion> {
    let created_at = Utc::now();
    pool.into_iter()
        .map(|candidate| {
            let distance_km = candidate.distance_km.unwrap_or_default();
            Suggestion {
                id: Uuid::new_v4().to_string(),
                name: candidate.name,
                description: candidate.description,
                lat: candidate.lat,
                lng: candidate.lng,
                distance_km,
                duration_min: candidate.duration_min.unwrap_or(query.minutes),
                rating: candidate.rating,
                open_now: candidate.open_now,
                opening_hours: candidate.opening_hours,
                parking: candidate.parking,
                source: candidate.source.unwrap_or(SuggestionSource::Google),
                url: candidate.url,
                photo_url: candidate.photo_url,
                created_at,
                eta_text: Some(eta_text(distance_km, Some(query.mode), EtaFormat::default())),
                detour_type: query.detour_type,
            }
        })
        .collect()
}
