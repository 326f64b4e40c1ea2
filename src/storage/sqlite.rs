use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use super::KeyValueStore;

/// SQLite-backed key-value store
pub struct SqliteStore {
    /// Path to the SQLite database file
    db_path: PathBuf,
}

/// Open a SQLite connection with standard pragmas (busy_timeout).
fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open database: {}", db_path.display()))?;
    conn.execute_batch("PRAGMA busy_timeout=5000;")
        .context("failed to set busy_timeout")?;
    Ok(conn)
}

impl SqliteStore {
    /// Create a new SQLite store at the given path
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        // Create parent directories if they don't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create directory: {}", parent.display())
                })?;
            }
        }

        let store = Self { db_path };
        store.init_schema()?;

        Ok(store)
    }

    /// Create a store using the default location (~/.course-cart/carts.db)
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".course-cart").join("carts.db"))
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn init_schema(&self) -> Result<()> {
        let conn = open_connection(&self.db_path)?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("failed to set WAL mode")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("failed to create kv table")?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_kv_updated ON kv(updated_at)",
            [],
        )
        .context("failed to create updated_at index")?;

        debug!(path = %self.db_path.display(), "initialized SQLite store");

        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = open_connection(&self.db_path)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .with_context(|| format!("failed to read key '{}'", key))?;
        debug!(key, found = value.is_some(), "read key");
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = open_connection(&self.db_path)?;
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, Utc::now().to_rfc3339()],
        )
        .with_context(|| format!("failed to write key '{}'", key))?;
        debug!(key, bytes = value.len(), "wrote key");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = open_connection(&self.db_path)?;
        conn.execute("DELETE FROM kv WHERE key = ?1", [key])
            .with_context(|| format!("failed to delete key '{}'", key))?;
        if conn.changes() > 0 {
            debug!(key, "deleted key");
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = open_connection(&self.db_path)?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY updated_at DESC, key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}
