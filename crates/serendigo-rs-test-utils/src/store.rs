use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serendigo_rs_protocol::{Destination, HistoryRecord, NewDestination};
use serendigo_rs_store::{DestinationStore, HistoryStore, NewHistoryEntry, StoreError};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    history: Vec<HistoryRecord>,
    destinations: Vec<Destination>,
    reads: usize,
}

/// Vec-backed store implementing both store traits.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a history record with an explicit choice time.
    pub fn seed_history(&self, entry: NewHistoryEntry, chosen_at: DateTime<Utc>) -> HistoryRecord {
        let mut inner = self.inner.lock();
        let record = HistoryRecord {
            id: inner.history.len() as i64 + 1,
            detour_type: entry.detour_type,
            name: entry.name,
            lat: entry.lat,
            lng: entry.lng,
            chosen_at,
            note: entry.note,
        };
        inner.history.push(record.clone());
        record
    }

    pub fn history(&self) -> Vec<HistoryRecord> {
        self.inner.lock().history.clone()
    }

    /// Number of `recent` calls served.
    pub fn history_reads(&self) -> usize {
        self.inner.lock().reads
    }
}

#[async_trait]
impl HistoryStore for InMemoryStore {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryRecord, StoreError> {
        Ok(self.seed_history(entry, Utc::now()))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let mut inner = self.inner.lock();
        inner.reads += 1;
        Ok(inner.history.iter().rev().take(limit).cloned().collect())
    }
}

#[async_trait]
impl DestinationStore for InMemoryStore {
    async fn create(&self, destination: NewDestination) -> Result<Destination, StoreError> {
        let mut inner = self.inner.lock();
        if inner
            .destinations
            .iter()
            .any(|existing| existing.place_id == destination.place_id)
        {
            return Err(StoreError::Conflict(format!(
                "destination with place_id {} already exists",
                destination.place_id
            )));
        }
        let created = Destination {
            id: Uuid::new_v4().to_string(),
            place_id: destination.place_id,
            name: destination.name,
            address: destination.address,
            lat: destination.lat,
            lng: destination.lng,
            created_at: Utc::now(),
        };
        inner.destinations.push(created.clone());
        Ok(created)
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Destination>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.destinations.iter().skip(skip).take(limit).cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Destination, StoreError> {
        self.inner
            .lock()
            .destinations
            .iter()
            .find(|destination| destination.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("destination {id}")))
    }
}

/// Every operation fails with a decode error.
#[derive(Clone, Default)]
pub struct FailingStore;

fn failure() -> StoreError {
    StoreError::Decode("store offline".to_string())
}

#[async_trait]
impl HistoryStore for FailingStore {
    async fn append(&self, _entry: NewHistoryEntry) -> Result<HistoryRecord, StoreError> {
        Err(failure())
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        Err(failure())
    }
}

#[async_trait]
impl DestinationStore for FailingStore {
    async fn create(&self, _destination: NewDestination) -> Result<Destination, StoreError> {
        Err(failure())
    }

    async fn list(&self, _skip: usize, _limit: usize) -> Result<Vec<Destination>, StoreError> {
        Err(failure())
    }

    async fn get(&self, _id: &str) -> Result<Destination, StoreError> {
        Err(failure())
    }
}
