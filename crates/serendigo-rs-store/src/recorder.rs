//! Records chosen detours and serves recent history.

use crate::error::StoreError;
use crate::store::{HistoryStore, NewHistoryEntry};
use log::info;
use serendigo_rs_protocol::{ChosenDetour, DetourType, HistoryRecord};
use std::sync::Arc;

/// Records returned when the caller gives no limit.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
/// Upper bound for a single history page.
pub const MAX_HISTORY_LIMIT: usize = 200;

/// Thin facade over a [`HistoryStore`] that owns the paging rules.
#[derive(Clone)]
pub struct HistoryRecorder {
    store: Arc<dyn HistoryStore>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Persist a choice. The description becomes the record note.
    pub async fn choose(
        &self,
        chosen: ChosenDetour,
        detour_type: DetourType,
    ) -> Result<HistoryRecord, StoreError> {
        let record = self
            .store
            .append(NewHistoryEntry {
                detour_type,
                name: chosen.name,
                lat: chosen.lat,
                lng: chosen.lng,
                note: chosen.description,
            })
            .await?;
        info!(
            "detour chosen (id={}, detour_type={}, name={})",
            record.id, record.detour_type, record.name
        );
        Ok(record)
    }

    /// Most recent records first; the limit is clamped to `1..=200`.
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<HistoryRecord>, StoreError> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        self.store.recent(limit).await
    }
}
