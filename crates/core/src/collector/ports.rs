//! Port interfaces for metric persistence and telemetry
//!
//! These traits define the boundaries between the collector and the
//! infrastructure that stores events or forwards them elsewhere.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use vitalscope_domain::Result;

/// Mutator passed to [`KeyValueStore::update`]
///
/// Receives the current value (if any) and returns the value to store.
/// Returning an error aborts the update and leaves the stored value intact.
pub type UpdateFn = Box<dyn FnOnce(Option<String>) -> Result<String> + Send>;

/// String key-value persistence
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Delete `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;

    /// Read-modify-write of a single key
    ///
    /// Backends that can hold a lock or transaction across the read and the
    /// write do so. Others are last-writer-wins across processes.
    async fn update(&self, key: &str, mutator: UpdateFn) -> Result<()>;
}

/// Severity attached to a telemetry message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// Message forwarded to an external telemetry service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    pub message: String,
    pub level: TelemetryLevel,
    pub tags: BTreeMap<String, String>,
}

impl TelemetryEvent {
    pub fn new(message: impl Into<String>, level: TelemetryLevel) -> Self {
        Self { message: message.into(), level, tags: BTreeMap::new() }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Fire-and-forget telemetry capture
///
/// `capture` must not block and must not fail; implementations that do I/O
/// hand the event off to a background task and log their own failures.
/// `flush` waits up to `timeout` for those tasks and abandons the rest.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    fn capture(&self, event: TelemetryEvent);

    async fn flush(&self, _timeout: Duration) {}
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn capture(&self, _event: TelemetryEvent) {}
}
