//! Shared helpers for application-level integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use vitalscope_common::testing::TempDir;
use vitalscope_common::time::MockClock;
use vitalscope_core::NoopTelemetrySink;
use vitalscope_domain::{Config, StorageBackend, StorageConfig};
use vitalscope_infra::MemoryKeyValueStore;
use vitalscope_lib::AppContext;

/// 2024-01-01T00:00:00Z
pub const JAN_1: i64 = 1_704_067_200_000;

/// In-memory context with a mock clock at [`JAN_1`]
pub fn memory_context() -> (AppContext, MockClock) {
    let clock = MockClock::at_millis(JAN_1);
    let context = AppContext::from_parts(
        Config::default(),
        Arc::new(MemoryKeyValueStore::new()),
        Arc::new(NoopTelemetrySink),
        Arc::new(clock.clone()),
    );
    (context, clock)
}

/// Config pointing the SQLite backend into `dir`
pub fn sqlite_config(dir: &TempDir) -> Config {
    Config {
        storage: StorageConfig {
            backend: StorageBackend::Sqlite,
            path: dir.join("vitalscope.db").display().to_string(),
            ..StorageConfig::default()
        },
        ..Config::default()
    }
}
