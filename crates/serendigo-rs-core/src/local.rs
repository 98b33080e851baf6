//! History-only lookup: nearby past choices instead of live providers.

use crate::engine::{MAX_SUGGESTIONS, RADIUS_SLACK};
use crate::geo::{EtaFormat, eta_text, haversine_km, proportional_minutes};
use serendigo_rs_protocol::{HistoryRecord, SearchQuery, Suggestion, SuggestionSource};
use uuid::Uuid;

/// Turn recent history into at most three suggestions near the origin.
///
/// Records beyond `radius_km * 1.5` are dropped; the rest are ordered by
/// distance. Each suggestion keeps the record's own detour type and echoes
/// its choice time as `created_at`.
pub fn nearby_history(
    records: &[HistoryRecord],
    query: &SearchQuery,
    radius_km: f64,
) -> Vec<Suggestion> {
    let max_km = radius_km * RADIUS_SLACK;
    let mut nearby: Vec<(f64, &HistoryRecord)> = records
        .iter()
        .map(|record| {
            (
                haversine_km(query.lat, query.lng, record.lat, record.lng),
                record,
            )
        })
        .filter(|(distance_km, _)| *distance_km <= max_km)
        .collect();
    nearby.sort_by(|(left, _), (right, _)| left.total_cmp(right));
    nearby
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(distance_km, record)| Suggestion {
            id: Uuid::new_v4().to_string(),
            name: record.name.clone(),
            description: record.note.clone(),
            lat: record.lat,
            lng: record.lng,
            distance_km,
            duration_min: proportional_minutes(distance_km, radius_km, query.minutes),
            rating: None,
            open_now: None,
            opening_hours: None,
            parking: None,
            source: SuggestionSource::Local,
            url: None,
            photo_url: None,
            created_at: record.chosen_at,
            eta_text: Some(eta_text(distance_km, Some(query.mode), EtaFormat::default())),
            detour_type: record.detour_type,
        })
        .collect()
}
