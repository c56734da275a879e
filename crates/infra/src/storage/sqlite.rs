//! SQLite-backed key-value store
//!
//! Values live in the `kv_store` table. Every call runs on the blocking pool.
//! `update` reads, mutates and writes inside one `IMMEDIATE` transaction, so
//! concurrent writers (including other processes) queue on the write lock
//! instead of overwriting each other.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use tracing::{debug, instrument};
use vitalscope_common::storage::PoolHealth;
use vitalscope_core::{KeyValueStore, UpdateFn};
use vitalscope_domain::{Result, VitalScopeError};

use crate::database::manager::{map_sql_error, map_storage_error};
use crate::database::DbManager;
use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    db: Arc<DbManager>,
}

impl SqliteKeyValueStore {
    /// Open the database at `path` and apply the schema
    pub fn open(path: impl AsRef<Path>, pool_size: u32) -> Result<Self> {
        let db = DbManager::new(path, pool_size)?;
        db.run_migrations()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Wrap a manager whose migrations have already run
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    pub fn manager(&self) -> &Arc<DbManager> {
        &self.db
    }

    pub fn health_check(&self) -> Result<PoolHealth> {
        self.db.health_check()
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&DbManager) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| VitalScopeError::from(InfraError::from(e)))?
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            select_value(&conn, &key)
        })
        .await
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            upsert(&conn, &key, &value)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |db| {
            let conn = db.get_connection()?;
            let removed = conn
                .execute("DELETE FROM kv_store WHERE key = ?1", params![key])
                .map_err(map_storage_error)?;
            debug!(key = %key, removed, "kv entry removed");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self, mutator))]
    async fn update(&self, key: &str, mutator: UpdateFn) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |db| {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let current = select_value(&tx, &key)?;

            // An error from the mutator drops `tx`, rolling back.
            let next = mutator(current)?;
            upsert(&tx, &key, &next)?;
            tx.commit().map_err(map_sql_error)
        })
        .await
    }
}

fn select_value(conn: &rusqlite::Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get(0))
        .optional()
        .map_err(map_sql_error)
}

fn upsert(conn: &rusqlite::Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, CAST(strftime('%s','now') AS INTEGER))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value],
    )
    .map_err(map_sql_error)?;
    Ok(())
}
