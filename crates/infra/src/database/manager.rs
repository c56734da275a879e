//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::params;
use tracing::{debug, error, info, warn};
use vitalscope_common::error::ErrorClassification;
use vitalscope_common::storage::{
    PoolHealth, SqliteConnection, SqlitePool, SqlitePoolConfig, StorageError,
};
use vitalscope_domain::{Result, VitalScopeError};

use crate::errors::InfraError;

pub(crate) const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Database manager that wraps a [`SqlitePool`].
#[derive(Debug)]
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Open the database at `db_path` with up to `pool_size` connections.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| VitalScopeError::from(InfraError::from(e)))?;
        }

        let config = SqlitePoolConfig::with_max_size(pool_size);
        let pool = SqlitePool::new(&path, config).map_err(map_storage_error)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.config().max_size,
            "sqlite pool initialised"
        );

        Ok(Self { pool: Arc::new(pool), path })
    }

    /// Borrow the underlying pool.
    pub fn pool(&self) -> &Arc<SqlitePool> {
        &self.pool
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get().map_err(map_storage_error)
    }

    /// Ensure the full schema exists on the current database.
    ///
    /// Refuses to run against a database written by a newer schema.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;

        let found: Option<i32> = conn
            .query_row("SELECT MAX(version) FROM schema_version", &[], |row| row.get(0))
            .map_err(map_storage_error)?;

        match found {
            Some(version) if version > SCHEMA_VERSION => {
                warn!(expected = SCHEMA_VERSION, found = version, "database schema is newer");
                Err(map_storage_error(StorageError::SchemaVersionMismatch {
                    expected: SCHEMA_VERSION,
                    found: version,
                }))
            }
            Some(version) if version == SCHEMA_VERSION => Ok(()),
            _ => {
                conn.execute(
                    "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
                    params![SCHEMA_VERSION],
                )
                .map_err(map_storage_error)?;
                info!(version = SCHEMA_VERSION, "database schema applied");
                Ok(())
            }
        }
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify the database is reachable and answering queries.
    pub fn health_check(&self) -> Result<PoolHealth> {
        let health = self.pool.health_check();
        if health.healthy {
            Ok(health)
        } else {
            Err(VitalScopeError::Storage(
                health.message.unwrap_or_else(|| "database health check failed".to_string()),
            ))
        }
    }
}

pub(crate) fn map_sql_error(err: rusqlite::Error) -> VitalScopeError {
    VitalScopeError::from(InfraError::from(err))
}

pub(crate) fn map_storage_error(err: StorageError) -> VitalScopeError {
    if err.is_critical() {
        error!(error = %err, severity = %err.severity(), "storage failure needs attention");
    } else if err.is_retryable() {
        debug!(error = %err, "transient storage failure");
    }
    VitalScopeError::from(InfraError::from(err))
}
