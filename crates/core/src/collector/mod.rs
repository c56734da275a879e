//! Metric collection and persistence

pub mod ports;
pub mod service;

pub use ports::{KeyValueStore, NoopTelemetrySink, TelemetryEvent, TelemetryLevel, TelemetrySink, UpdateFn};
pub use service::{CollectorConfig, MetricsCollector};
