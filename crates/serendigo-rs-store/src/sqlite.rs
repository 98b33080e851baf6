//! SQLite-backed history and destination store.

use crate::error::StoreError;
use crate::store::{DestinationStore, HistoryStore, NewHistoryEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use serendigo_rs_protocol::{Destination, DetourType, HistoryRecord, NewDestination};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS detour_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        detour_type TEXT NOT NULL,
        name TEXT NOT NULL,
        lat REAL NOT NULL,
        lng REAL NOT NULL,
        chosen_at TEXT NOT NULL,
        note TEXT
    );
    CREATE TABLE IF NOT EXISTS destinations (
        id TEXT PRIMARY KEY,
        place_id TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        address TEXT NOT NULL DEFAULT '',
        lat REAL NOT NULL,
        lng REAL NOT NULL,
        created_at TEXT NOT NULL
    );
";

/// Where a database URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

impl DatabaseLocation {
    /// Parse `sqlite://path`, `sqlite:///path`, a bare path, or `:memory:`.
    ///
    /// Three slashes keep the remainder relative (`sqlite:///./x.db` is
    /// `./x.db`); an absolute path takes four (`sqlite:////var/x.db`).
    pub fn parse(url: &str) -> Self {
        let url = url.trim();
        let path = url
            .strip_prefix("sqlite:///")
            .or_else(|| url.strip_prefix("sqlite://"))
            .unwrap_or(url);
        if path.is_empty() || path == ":memory:" {
            DatabaseLocation::Memory
        } else {
            DatabaseLocation::File(PathBuf::from(path))
        }
    }
}

/// Record store backed by a single SQLite connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open the database named by a URL and ensure the schema exists.
    pub fn open_url(url: &str) -> Result<Self, StoreError> {
        match DatabaseLocation::parse(url) {
            DatabaseLocation::Memory => Self::open_in_memory(),
            DatabaseLocation::File(path) => Self::open(&path),
        }
    }

    /// Open or create a database file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
        info!("opened sqlite store (path={})", path.display());
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

/// History row as stored; the detour type is still raw text.
struct HistoryRow {
    id: i64,
    detour_type: String,
    name: String,
    lat: f64,
    lng: f64,
    chosen_at: DateTime<Utc>,
    note: Option<String>,
}

impl HistoryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            detour_type: row.get("detour_type")?,
            name: row.get("name")?,
            lat: row.get("lat")?,
            lng: row.get("lng")?,
            chosen_at: row.get("chosen_at")?,
            note: row.get("note")?,
        })
    }

    fn into_record(self) -> Result<HistoryRecord, StoreError> {
        let detour_type: DetourType = self.detour_type.parse().map_err(|_| {
            StoreError::Decode(format!(
                "history {}: unknown detour_type {:?}",
                self.id, self.detour_type
            ))
        })?;
        Ok(HistoryRecord {
            id: self.id,
            detour_type,
            name: self.name,
            lat: self.lat,
            lng: self.lng,
            chosen_at: self.chosen_at,
            note: self.note,
        })
    }
}

fn destination_from_row(row: &Row<'_>) -> rusqlite::Result<Destination> {
    Ok(Destination {
        id: row.get("id")?,
        place_id: row.get("place_id")?,
        name: row.get("name")?,
        address: row.get("address")?,
        lat: row.get("lat")?,
        lng: row.get("lng")?,
        created_at: row.get("created_at")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _) if code.code == ErrorCode::ConstraintViolation
    )
}

fn to_sql_limit(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl HistoryStore for SqliteStore {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryRecord, StoreError> {
        let chosen_at: DateTime<Utc> = Utc::now();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO detour_history (detour_type, name, lat, lng, chosen_at, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.detour_type.as_str(),
                entry.name,
                entry.lat,
                entry.lng,
                chosen_at,
                entry.note,
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("history appended (id={id}, detour_type={})", entry.detour_type);
        Ok(HistoryRecord {
            id,
            detour_type: entry.detour_type,
            name: entry.name,
            lat: entry.lat,
            lng: entry.lng,
            chosen_at,
            note: entry.note,
        })
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let rows = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(
                "SELECT id, detour_type, name, lat, lng, chosen_at, note
                 FROM detour_history ORDER BY id DESC LIMIT ?1",
            )?;
            stmt.query_map(params![to_sql_limit(limit)], HistoryRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };
        rows.into_iter().map(HistoryRow::into_record).collect()
    }
}

#[async_trait]
impl DestinationStore for SqliteStore {
    async fn create(&self, destination: NewDestination) -> Result<Destination, StoreError> {
        let created = Destination {
            id: Uuid::new_v4().to_string(),
            place_id: destination.place_id,
            name: destination.name,
            address: destination.address,
            lat: destination.lat,
            lng: destination.lng,
            created_at: Utc::now(),
        };
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO destinations (id, place_id, name, address, lat, lng, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                created.id,
                created.place_id,
                created.name,
                created.address,
                created.lat,
                created.lng,
                created.created_at,
            ],
        );
        match result {
            Ok(_) => {
                debug!("destination created (id={}, place_id={})", created.id, created.place_id);
                Ok(created)
            }
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(format!(
                "destination with place_id {} already exists",
                created.place_id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<Destination>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, place_id, name, address, lat, lng, created_at
             FROM destinations ORDER BY rowid ASC LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
            .query_map(
                params![to_sql_limit(limit), to_sql_limit(skip)],
                destination_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Destination, StoreError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, place_id, name, address, lat, lng, created_at
             FROM destinations WHERE id = ?1",
            params![id],
            destination_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::NotFound(format!("destination {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(name: &str, detour_type: DetourType) -> NewHistoryEntry {
        NewHistoryEntry {
            detour_type,
            name: name.to_string(),
            lat: 35.0,
            lng: 139.0,
            note: None,
        }
    }

    #[test]
    fn parses_database_urls() {
        assert_eq!(DatabaseLocation::parse(":memory:"), DatabaseLocation::Memory);
        assert_eq!(DatabaseLocation::parse("sqlite://"), DatabaseLocation::Memory);
        assert_eq!(
            DatabaseLocation::parse("sqlite://./serendigo.db"),
            DatabaseLocation::File(PathBuf::from("./serendigo.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("sqlite:///./serendigo.db"),
            DatabaseLocation::File(PathBuf::from("./serendigo.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("sqlite:////var/lib/s.db"),
            DatabaseLocation::File(PathBuf::from("/var/lib/s.db"))
        );
        assert_eq!(
            DatabaseLocation::parse("data/s.db"),
            DatabaseLocation::File(PathBuf::from("data/s.db"))
        );
    }

    #[tokio::test]
    async fn history_ids_increase_and_recent_is_newest_first() {
        let store = SqliteStore::open_in_memory().expect("store");
        let first = store.append(entry("one", DetourType::Food)).await.expect("one");
        let second = store.append(entry("two", DetourType::Spot)).await.expect("two");
        assert!(second.id > first.id);

        let recent = store.recent(10).await.expect("recent");
        let names: Vec<_> = recent.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["two", "one"]);
        assert_eq!(recent[0].detour_type, DetourType::Spot);
        assert_eq!(recent[1].chosen_at, first.chosen_at);

        assert_eq!(store.recent(1).await.expect("one").len(), 1);
    }

    #[tokio::test]
    async fn duplicate_place_id_is_conflict() {
        let store = SqliteStore::open_in_memory().expect("store");
        let destination = NewDestination {
            place_id: "p-1".to_string(),
            name: "Castle".to_string(),
            address: "1-1 Hill".to_string(),
            lat: 34.0,
            lng: 135.0,
        };
        let created = store.create(destination.clone()).await.expect("create");
        let err = store.create(destination).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let fetched = store.get(&created.id).await.expect("get");
        assert_eq!(fetched, created);
        assert!(matches!(
            store.get("missing").await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn destinations_list_in_insertion_order_with_paging() {
        let store = SqliteStore::open_in_memory().expect("store");
        for idx in 0..5 {
            store
                .create(NewDestination {
                    place_id: format!("p-{idx}"),
                    name: format!("Place {idx}"),
                    address: String::new(),
                    lat: 0.0,
                    lng: 0.0,
                })
                .await
                .expect("create");
        }
        let page = store.list(1, 2).await.expect("list");
        let ids: Vec<_> = page.iter().map(|d| d.place_id.as_str()).collect();
        assert_eq!(ids, vec!["p-1", "p-2"]);
        assert!(store.list(10, 5).await.expect("empty").is_empty());
    }
}
