//! Storage primitives for SQLite-backed persistence
//!
//! This module provides the r2d2 connection pool, a thin connection wrapper,
//! per-connection pragmas and the storage error type shared by the
//! infrastructure adapters.

pub mod config;
pub mod connection;
pub mod error;
pub mod pool;
pub mod pragmas;

// Re-export commonly used types
pub use config::SqlitePoolConfig;
pub use connection::SqliteConnection;
pub use error::{StorageError, StorageResult};
pub use pool::{PoolHealth, SqlitePool};
pub use pragmas::apply_connection_pragmas;
