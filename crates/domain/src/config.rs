//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_PAGE_URL, DEFAULT_TELEMETRY_TIMEOUT_MS, MAX_STORED_METRICS,
};
use crate::errors::{Result, VitalScopeError};
use crate::impl_domain_status_conversions;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub collection: CollectionConfig,
    pub telemetry: TelemetryConfig,
}

/// Key-value store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    #[default]
    Sqlite,
}

impl_domain_status_conversions!(StorageBackend {
    Memory => "memory",
    File => "file",
    Sqlite => "sqlite",
});

/// Storage configuration
///
/// `path` is the database file for the SQLite backend and the directory for
/// the file backend. The memory backend ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: String,
    pub pool_size: u32,
    pub max_entries: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: "vitalscope.db".to_string(),
            pool_size: 4,
            max_entries: MAX_STORED_METRICS,
        }
    }
}

/// Metric collection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Recorded as the `url` of every metric event
    pub page_url: String,
    pub auto_start: bool,
    /// Buffer size of each performance entry stream
    pub channel_capacity: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_string(),
            auto_start: true,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// External telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { enabled: false, endpoint: None, timeout_ms: DEFAULT_TELEMETRY_TIMEOUT_MS }
    }
}

impl Config {
    /// Reject sizes no component can run with
    ///
    /// # Errors
    /// Returns `VitalScopeError::Config` naming the first field below 1.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("storage.max_entries", self.storage.max_entries),
            ("storage.pool_size", self.storage.pool_size as usize),
            ("collection.channel_capacity", self.collection.channel_capacity),
        ];

        for (field, value) in sizes {
            if value < 1 {
                return Err(VitalScopeError::Config(format!(
                    "{field} must be at least 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}
