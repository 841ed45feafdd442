//! Key/value document storage behind the care store.
//!
//! Each key holds one whole JSON array, rewritten in full on every mutation.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::error::StoreResult;

/// Trait for document storage backends.
///
/// Implementations must be `Sync` so a store can be shared for reads; the
/// SQLite implementation serialises access with a mutex.
pub trait DocumentBackend: Send + Sync {
    /// Read the document stored under `key`, or `None` if absent.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the document stored under `key`.
    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        self.write_many(&[(key, value)])
    }

    /// Replace several documents atomically: either all are written or none.
    fn write_many(&self, entries: &[(&str, &str)]) -> StoreResult<()>;
}

impl<T: DocumentBackend + ?Sized> DocumentBackend for Arc<T> {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).write(key, value)
    }

    fn write_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        (**self).write_many(entries)
    }
}

/// SQLite-backed document store.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Open (or create) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!("Opened document store at {}", path.as_ref().display());
        Self::with_connection(conn)
    }

    /// Create an in-memory store.
    pub fn in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl DocumentBackend for SqliteDocumentStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        for (key, value) in entries {
            tx.execute(
                r#"
                INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, value, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_missing_key_reads_none() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        assert_eq!(store.read("care-reminders").unwrap(), None);
    }

    #[test]
    fn test_write_replaces_value() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        store.write("bonsai-profiles", "[]").unwrap();
        store.write("bonsai-profiles", r#"[{"id":"p-1"}]"#).unwrap();

        assert_eq!(
            store.read("bonsai-profiles").unwrap().as_deref(),
            Some(r#"[{"id":"p-1"}]"#)
        );
    }

    #[test]
    fn test_write_many_writes_all() {
        let store = SqliteDocumentStore::in_memory().unwrap();
        store
            .write_many(&[("bonsai-profiles", "[1]"), ("care-reminders", "[2]")])
            .unwrap();

        assert_eq!(store.read("bonsai-profiles").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.read("care-reminders").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.db");
        {
            let store = SqliteDocumentStore::open(&path).unwrap();
            store.write("pruning-sessions", "[]").unwrap();
        }
        let store = SqliteDocumentStore::open(&path).unwrap();
        assert_eq!(store.read("pruning-sessions").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_arc_backend_delegates() {
        let store = Arc::new(SqliteDocumentStore::in_memory().unwrap());
        let shared = Arc::clone(&store);
        shared.write("care-reminders", "[]").unwrap();
        assert!(store.read("care-reminders").unwrap().is_some());
    }
}
