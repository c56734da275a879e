//! Shared test helpers for `vitalscope-core` integration tests.
//!
//! In-memory fakes for every core port so the collector, observer and survey
//! tests can focus on behaviour instead of infrastructure.

#![allow(dead_code)]

pub mod fakes;

use std::sync::Arc;

use vitalscope_common::time::MockClock;
use vitalscope_core::{CollectorConfig, MetricsCollector};

pub use fakes::{FailingStore, InMemoryStore, RecordingTelemetry, ScriptedEntrySource};

/// 2024-01-01T00:00:00Z
pub const JAN_1: i64 = 1_704_067_200_000;

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub telemetry: Arc<RecordingTelemetry>,
    pub clock: MockClock,
    pub collector: Arc<MetricsCollector>,
}

/// Started collector over fresh fakes
pub fn harness(max_entries: usize) -> Harness {
    let store = Arc::new(InMemoryStore::default());
    let telemetry = Arc::new(RecordingTelemetry::default());
    let clock = MockClock::at_millis(JAN_1);
    let collector = Arc::new(MetricsCollector::new(
        store.clone(),
        telemetry.clone(),
        Arc::new(clock.clone()),
        CollectorConfig { page_url: "app://test".to_string(), max_entries },
    ));
    collector.start();

    Harness { store, telemetry, clock, collector }
}
