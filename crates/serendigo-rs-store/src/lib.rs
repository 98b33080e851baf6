//! Record storage for chosen detours and saved destinations.

pub mod error;
pub mod recorder;
pub mod sqlite;
pub mod store;

/// Store error type.
pub use error::StoreError;
/// History recorder facade.
pub use recorder::{DEFAULT_HISTORY_LIMIT, HistoryRecorder, MAX_HISTORY_LIMIT};
/// SQLite-backed store.
pub use sqlite::{DatabaseLocation, SqliteStore};
/// Store interfaces and write models.
pub use store::{DestinationStore, HistoryStore, NewHistoryEntry};
