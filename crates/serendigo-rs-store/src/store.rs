//! Store interfaces used by the search engine, recorder, and guide pipeline.

use crate::error::StoreError;
use async_trait::async_trait;
use serendigo_rs_protocol::{Destination, DetourType, HistoryRecord, NewDestination};

/// A choice about to be persisted. Id and timestamp are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryEntry {
    pub detour_type: DetourType,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub note: Option<String>,
}

/// Append-only history of chosen detours.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist a new record and return it with its assigned id and time.
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryRecord, StoreError>;

    /// Return up to `limit` records, most recent (highest id) first.
    async fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError>;
}

/// Saved destinations.
#[async_trait]
pub trait DestinationStore: Send + Sync {
    /// Persist a destination; a duplicate `place_id` is a conflict.
    async fn create(&self, destination: NewDestination) -> Result<Destination, StoreError>;

    /// List destinations in insertion order.
    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Destination>, StoreError>;

    /// Fetch a destination by id.
    async fn get(&self, id: &str) -> Result<Destination, StoreError>;
}
