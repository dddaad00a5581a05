use crate::error::StoreError;
use rusqlite::{Connection, OptionalExtension, Result, params};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Slot holding the full discovered link tree.
pub const LINK_TREE_SLOT: &str = "linkTree";
/// Slot holding the flat selection list.
pub const SELECTED_LINKS_SLOT: &str = "selectedLinks";

/// A durable key-value slot medium. Values are opaque JSON blobs.
pub trait SlotStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError>;
    fn put(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError>;
}

pub struct Database {
    conn: Connection,
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl Database {
    pub fn drop(path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn in_memory() -> Result<Self> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            -- Opaque persisted state, one JSON blob per slot
            CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
            ",
        )?;
        Ok(())
    }

    pub fn put_slot(&self, key: &str, value: &str) -> Result<()> {
        let timestamp = current_timestamp();
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, timestamp],
        )?;
        Ok(())
    }

    pub fn get_slot(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM slots WHERE key = ?1")?;
        let value = stmt.query_row(params![key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    pub fn delete_slot(&self, key: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM slots WHERE key = ?1", params![key])?;
        Ok(deleted > 0)
    }

    pub fn slot_updated_at(&self, key: &str) -> Result<Option<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT updated_at FROM slots WHERE key = ?1")?;
        let value = stmt.query_row(params![key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    pub fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotStore for Database {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        Ok(self.get_slot(key)?)
    }

    fn put(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        Ok(self.put_slot(key, value)?)
    }
}

/// Slots kept in a map; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemorySlots {
    slots: HashMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl SlotStore for MemorySlots {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
