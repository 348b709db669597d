//! SQLite-backed visitor record store.
//!
//! The recognizer posts each successful identification here in addition to
//! its CSV log. This store is independent of the attendance engine, which
//! only reads the CSV.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    confidence REAL NOT NULL,
    timestamp TEXT NOT NULL
);
"#;

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: i64,
    pub name: String,
    pub confidence: f64,
    pub timestamp: String,
}

/// Body of `POST /api/db/records`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecord {
    pub name: String,
    pub confidence: f64,
    /// RFC3339; defaults to now (UTC) when missing or empty
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl NewRecord {
    fn resolved_timestamp(&self) -> String {
        match self.timestamp.as_deref().map(str::trim) {
            Some(ts) if !ts.is_empty() => ts.to_string(),
            _ => Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Clamp a requested listing size; out-of-range values use the default.
pub fn list_limit(requested: Option<i64>) -> usize {
    match requested {
        Some(n) if n > 0 && n as usize <= MAX_LIST_LIMIT => n as usize,
        _ => DEFAULT_LIST_LIMIT,
    }
}

pub struct RecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl RecordStore {
    /// Open (or create) the database at `db_path`, creating parent
    /// directories as needed. `:memory:` opens a private in-memory store.
    pub fn open(db_path: &str) -> Result<Self> {
        if db_path != ":memory:" {
            if let Some(parent) = Path::new(db_path).parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database at {}", db_path))?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize database schema")?;

        info!(path = db_path, "record store initialized");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Insert a record and return its id.
    pub fn insert(&self, record: &NewRecord) -> Result<i64> {
        let timestamp = record.resolved_timestamp();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO records (name, confidence, timestamp) VALUES (?1, ?2, ?3)",
            params![record.name, record.confidence, timestamp],
        )
        .context("Failed to insert record")?;
        Ok(conn.last_insert_rowid())
    }

    /// Newest records first.
    pub fn list(&self, limit: usize) -> Result<Vec<StoredRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, confidence, timestamp FROM records ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(StoredRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                confidence: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;

        let records = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read records")?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(name: &str, ts: Option<&str>) -> NewRecord {
        NewRecord {
            name: name.to_string(),
            confidence: 0.91,
            timestamp: ts.map(String::from),
        }
    }

    #[test]
    fn test_insert_and_list_newest_first() {
        let store = RecordStore::in_memory().expect("Failed to create database");
        store.insert(&new_record("alice", Some("2024-01-01T09:00:00Z"))).unwrap();
        store.insert(&new_record("bob", Some("2024-01-01T10:00:00Z"))).unwrap();

        let listed = store.list(10).unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
        assert_eq!(listed[1].timestamp, "2024-01-01T09:00:00Z");
    }

    #[test]
    fn test_missing_timestamp_defaults_to_now() {
        let store = RecordStore::in_memory().unwrap();
        store.insert(&new_record("carol", None)).unwrap();
        store.insert(&new_record("dave", Some("  "))).unwrap();

        for rec in store.list(10).unwrap() {
            assert!(chrono::DateTime::parse_from_rfc3339(&rec.timestamp).is_ok());
        }
    }

    #[test]
    fn test_list_respects_limit() {
        let store = RecordStore::in_memory().unwrap();
        for i in 0..5 {
            store.insert(&new_record(&format!("p{}", i), None)).unwrap();
        }
        assert_eq!(store.list(3).unwrap().len(), 3);
    }

    #[test]
    fn test_list_limit_bounds() {
        assert_eq!(list_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(list_limit(Some(0)), DEFAULT_LIST_LIMIT);
        assert_eq!(list_limit(Some(501)), DEFAULT_LIST_LIMIT);
        assert_eq!(list_limit(Some(500)), 500);
        assert_eq!(list_limit(Some(7)), 7);
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("face.db");
        let store = RecordStore::open(path.to_str().unwrap()).unwrap();
        store.insert(&new_record("erin", None)).unwrap();
        assert!(path.exists());
    }
}
