//! Key-value store adapters
//!
//! [`build_store`] picks the backend named in [`StorageConfig`].

mod file;
mod memory;
mod sqlite;

use std::path::Path;
use std::sync::Arc;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;
use tracing::info;
use vitalscope_core::KeyValueStore;
use vitalscope_domain::{Result, StorageBackend, StorageConfig};

/// Open the configured key-value store
pub fn build_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    info!(backend = %config.backend, path = %config.path, "opening key-value store");

    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryKeyValueStore::new()),
        StorageBackend::File => Arc::new(FileKeyValueStore::new(Path::new(&config.path))?),
        StorageBackend::Sqlite => {
            Arc::new(SqliteKeyValueStore::open(&config.path, config.pool_size)?)
        }
    };

    Ok(store)
}
