//! Fake port implementations

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use vitalscope_core::{KeyValueStore, PerformanceEntrySource, TelemetryEvent, TelemetrySink, UpdateFn};
use vitalscope_domain::{EntryType, PerformanceEntry, Result, VitalScopeError};

/// HashMap-backed store with atomic updates
#[derive(Default)]
pub struct InMemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().remove(key);
        Ok(())
    }

    async fn update(&self, key: &str, mutator: UpdateFn) -> Result<()> {
        let mut values = self.values.lock();
        let next = mutator(values.get(key).cloned())?;
        values.insert(key.to_string(), next);
        Ok(())
    }
}

/// Store whose operations fail while `failing` is set
#[derive(Default)]
pub struct FailingStore {
    pub inner: InMemoryStore,
    failing: AtomicBool,
}

impl FailingStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(VitalScopeError::Storage("disk unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.check()?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.inner.remove(key).await
    }

    async fn update(&self, key: &str, mutator: UpdateFn) -> Result<()> {
        self.check()?;
        self.inner.update(key, mutator).await
    }
}

/// Telemetry sink that keeps every captured event
#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn capture(&self, event: TelemetryEvent) {
        self.events.lock().push(event);
    }
}

/// Entry source that replays fixed entries per type, then closes the stream
pub struct ScriptedEntrySource {
    entries: Vec<PerformanceEntry>,
    unsupported: HashSet<EntryType>,
}

impl ScriptedEntrySource {
    pub fn new(entries: Vec<PerformanceEntry>) -> Self {
        Self { entries, unsupported: HashSet::new() }
    }

    pub fn without(mut self, entry_type: EntryType) -> Self {
        self.unsupported.insert(entry_type);
        self
    }
}

impl PerformanceEntrySource for ScriptedEntrySource {
    fn subscribe(&self, entry_type: EntryType) -> Result<mpsc::Receiver<PerformanceEntry>> {
        if self.unsupported.contains(&entry_type) {
            return Err(VitalScopeError::Observation(format!("{} not supported", entry_type)));
        }

        let matching: Vec<_> =
            self.entries.iter().filter(|entry| entry.entry_type() == entry_type).cloned().collect();
        let (tx, rx) = mpsc::channel(matching.len().max(1));
        for entry in matching {
            tx.try_send(entry).map_err(|err| VitalScopeError::Internal(err.to_string()))?;
        }
        Ok(rx)
    }
}
