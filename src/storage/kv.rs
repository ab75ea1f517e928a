use std::{
    sync::{Mutex, MutexGuard},
    time::SystemTime,
};

use anyhow::anyhow;
use rusqlite::{OptionalExtension, params};

use crate::{
    config,
    storage::{
        KeyValueStore,
        db::{self, SecondsSinceUnix, system_time_to_i64},
        error::StorageError,
        schema::{columns::*, tables::*},
    },
};

/// A stored key and the time it was last written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub key: String,
    pub updated_at: SecondsSinceUnix,
}

/// Key-value store kept in a single SQLite table.
pub struct SqliteStore {
    db: Mutex<rusqlite::Connection>,
}

impl SqliteStore {
    /// when called, opens a data base connection
    pub fn new(db_config: &config::Database) -> Result<Self, StorageError> {
        Ok(Self::from_existing_conn(db::open(db_config)?))
    }

    pub fn from_existing_conn(db: rusqlite::Connection) -> Self {
        Self { db: Mutex::new(db) }
    }

    fn conn(&self) -> Result<MutexGuard<'_, rusqlite::Connection>, StorageError> {
        self.db.lock().map_err(|e| {
            StorageError::Internal(anyhow!("could not access the store under lock: {e}"))
        })
    }

    /// Lists stored keys starting with `prefix`, ordered by key.
    pub fn entries(&self, prefix: &str) -> Result<Vec<StoredEntry>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {KEY}, {UPDATED_AT} FROM {RECORDS}
             WHERE substr({KEY}, 1, length(?1)) = ?1
             ORDER BY {KEY}"
        ))?;

        let entries = stmt
            .query_map(params![prefix], |row| {
                Ok(StoredEntry {
                    key: row.get(0)?,
                    updated_at: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                &format!("SELECT {VALUE} FROM {RECORDS} WHERE {KEY} = ?1"),
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let now = system_time_to_i64(SystemTime::now()).map_err(StorageError::Internal)?;
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO {RECORDS} ({KEY}, {VALUE}, {UPDATED_AT}) VALUES (?1, ?2, ?3)
                 ON CONFLICT({KEY}) DO UPDATE SET
                    {VALUE} = excluded.{VALUE},
                    {UPDATED_AT} = excluded.{UPDATED_AT}"
            ),
            params![key, value, now],
        )?;
        Ok(())
    }
}
