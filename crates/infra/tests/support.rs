//! Shared helpers for infrastructure integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;
use vitalscope_common::time::MockClock;
use vitalscope_core::{CollectorConfig, KeyValueStore, MetricsCollector, NoopTelemetrySink};
use vitalscope_domain::{StorageBackend, StorageConfig};
use vitalscope_infra::build_store;

/// 2024-01-01T00:00:00Z
pub const JAN_1: i64 = 1_704_067_200_000;

pub const PERSISTENT_BACKENDS: [StorageBackend; 2] = [StorageBackend::File, StorageBackend::Sqlite];

pub const ALL_BACKENDS: [StorageBackend; 3] =
    [StorageBackend::Memory, StorageBackend::File, StorageBackend::Sqlite];

/// Store of the given backend inside a temporary directory that lives as
/// long as this value.
pub struct TestStore {
    pub store: Arc<dyn KeyValueStore>,
    pub config: StorageConfig,
    _dir: TempDir,
}

impl TestStore {
    pub fn new(backend: StorageBackend) -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = match backend {
            StorageBackend::Sqlite => dir.path().join("metrics.db"),
            _ => dir.path().join("kv"),
        };
        let config = StorageConfig {
            backend,
            path: path.display().to_string(),
            ..StorageConfig::default()
        };
        let store = build_store(&config).expect("store should open");

        Self { store, config, _dir: dir }
    }

    /// Open the same location again, as a second process would
    pub fn reopen(&self) -> Arc<dyn KeyValueStore> {
        build_store(&self.config).expect("store should reopen")
    }
}

/// Started collector over `store` with a mock clock at [`JAN_1`]
pub fn collector(
    store: Arc<dyn KeyValueStore>,
    max_entries: usize,
) -> (Arc<MetricsCollector>, MockClock) {
    let clock = MockClock::at_millis(JAN_1);
    let collector = Arc::new(MetricsCollector::new(
        store,
        Arc::new(NoopTelemetrySink),
        Arc::new(clock.clone()),
        CollectorConfig { page_url: "app://infra-test".to_string(), max_entries },
    ));
    collector.start();
    (collector, clock)
}
