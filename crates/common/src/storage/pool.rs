//! SQLite connection pool
//!
//! Provides r2d2-based connection pooling for the SQLite key-value store.

use std::path::Path;
use std::time::Instant;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::config::SqlitePoolConfig;
use super::connection::SqliteConnection;
use super::error::{StorageError, StorageResult};
use super::pragmas::apply_connection_pragmas;

/// Pool health snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolHealth {
    /// Whether a connection could be acquired and queried
    pub healthy: bool,
    /// Total connections currently held by the pool
    pub connections: u32,
    /// Idle connections available for checkout
    pub idle_connections: u32,
    /// Failure description when unhealthy
    pub message: Option<String>,
}

/// SQLite connection pool
///
/// Every connection gets the configured pragmas applied on creation. Schema
/// management is left to the caller.
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
}

impl SqlitePool {
    /// Open (or create) the database at `path` and build the pool
    ///
    /// A test connection is checked out before returning so that an
    /// unreadable path fails here rather than on first use.
    #[instrument(skip(config), fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        info!("Creating SQLite connection pool");

        let pool_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!("Failed to create connection pool: {}", e);
                StorageError::Connection(format!("Failed to create pool: {}", e))
            })?;

        info!("SQLite pool created with {} connections", config.max_size);

        Ok(Self { pool, config })
    }

    /// Check out a connection
    #[instrument(skip(self), fields(pool_size = self.config.max_size))]
    pub fn get(&self) -> StorageResult<SqliteConnection> {
        let start = Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                debug!(duration_ms = start.elapsed().as_millis() as u64, "Connection acquired");
                Ok(SqliteConnection::new(conn))
            }
            Err(e) => {
                let elapsed = start.elapsed();
                warn!("Failed to acquire connection after {:?}: {}", elapsed, e);
                if elapsed >= self.config.connection_timeout {
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    Err(StorageError::R2d2(e))
                }
            }
        }
    }

    /// Run `SELECT 1` on a pooled connection and report pool state
    pub fn health_check(&self) -> PoolHealth {
        let state = self.pool.state();
        let probe = self
            .get()
            .and_then(|conn| conn.query_row("SELECT 1", &[], |row| row.get::<_, i64>(0)));

        match probe {
            Ok(_) => PoolHealth {
                healthy: true,
                connections: state.connections,
                idle_connections: state.idle_connections,
                message: None,
            },
            Err(e) => PoolHealth {
                healthy: false,
                connections: state.connections,
                idle_connections: state.idle_connections,
                message: Some(e.to_string()),
            },
        }
    }

    /// Pool configuration
    pub fn config(&self) -> &SqlitePoolConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_pool_creation_and_checkout() {
        let temp_dir = TempDir::new().unwrap();
        let pool = SqlitePool::new(&temp_dir.path().join("pool.db"), SqlitePoolConfig::default())
            .unwrap();

        let conn = pool.get().unwrap();
        conn.execute("CREATE TABLE t (id INTEGER PRIMARY KEY)", &[]).unwrap();
        drop(conn);

        let health = pool.health_check();
        assert!(health.healthy);
        assert!(health.message.is_none());
    }

    #[test]
    fn test_pool_rejects_unwritable_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing-dir").join("pool.db");

        let result = SqlitePool::new(&path, SqlitePoolConfig::default());
        assert!(result.is_err());
    }
}
