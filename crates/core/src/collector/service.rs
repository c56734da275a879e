//! Metrics collector - buffers metric events and persists them in capped
//! batches

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};
use vitalscope_common::time::Clock;
use vitalscope_domain::constants::{
    DEFAULT_PAGE_URL, MAX_STORED_METRICS, METRICS_STORAGE_KEY, TASK_COMPLETION_METRIC,
    TIME_TO_VALUE_METRIC,
};
use vitalscope_domain::{
    AnalysisReport, Config, MetricCategory, MetricEvent, MetricPayload, MetricsExport, Result,
    VitalName, WebVitalsSnapshot,
};

use super::ports::{KeyValueStore, TelemetryEvent, TelemetryLevel, TelemetrySink};
use crate::analysis::MetricsAnalyzer;

/// Collector settings
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    /// Stamped as the `url` of every event
    pub page_url: String,
    /// Persisted history is trimmed to this many most recent events
    pub max_entries: usize,
}

impl CollectorConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_url: config.collection.page_url.clone(),
            max_entries: config.storage.max_entries,
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self { page_url: DEFAULT_PAGE_URL.to_string(), max_entries: MAX_STORED_METRICS }
    }
}

/// Append-only metric buffer backed by a [`KeyValueStore`]
///
/// Recording is a no-op until [`start`](Self::start) is called. Every recorded
/// event is saved immediately: the persisted array is read, the buffered
/// events are appended, the result is trimmed to the most recent
/// `max_entries` and written back. If the save fails the events stay buffered
/// and go out with the next save.
pub struct MetricsCollector {
    store: Arc<dyn KeyValueStore>,
    telemetry: Arc<dyn TelemetrySink>,
    clock: Arc<dyn Clock>,
    config: CollectorConfig,
    started: AtomicBool,
    buffer: Mutex<Vec<MetricEvent>>,
    snapshot: Mutex<WebVitalsSnapshot>,
    save_lock: tokio::sync::Mutex<()>,
}

impl MetricsCollector {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        telemetry: Arc<dyn TelemetrySink>,
        clock: Arc<dyn Clock>,
        config: CollectorConfig,
    ) -> Self {
        Self {
            store,
            telemetry,
            clock,
            config,
            started: AtomicBool::new(false),
            buffer: Mutex::new(Vec::new()),
            snapshot: Mutex::new(WebVitalsSnapshot::new()),
            save_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn start(&self) {
        if !self.started.swap(true, Ordering::SeqCst) {
            info!(page_url = %self.config.page_url, "Metrics collection started");
        }
    }

    pub fn stop(&self) {
        if self.started.swap(false, Ordering::SeqCst) {
            info!("Metrics collection stopped");
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Record a metric event and persist it
    ///
    /// Returns `Ok(())` without recording when collection is stopped.
    pub async fn record_metric(
        &self,
        name: impl Into<String>,
        value: f64,
        payload: MetricPayload,
    ) -> Result<()> {
        let name = name.into();
        if !self.is_started() {
            debug!(metric = %name, "Collection stopped, metric dropped");
            return Ok(());
        }

        let event = MetricEvent {
            name,
            value,
            timestamp: self.clock.now_millis(),
            url: self.config.page_url.clone(),
            payload,
        };
        debug!(metric = %event.name, category = %event.category(), value, "Metric recorded");

        self.buffer.lock().push(event);
        self.save().await
    }

    /// Update the vitals snapshot and record a `web_vital` event
    ///
    /// The snapshot is updated even while collection is stopped. The event and
    /// the telemetry message are only produced while it runs.
    pub async fn record_web_vital(&self, vital: VitalName, value: f64) -> Result<()> {
        self.snapshot.lock().insert(vital, value);

        if !self.is_started() {
            return Ok(());
        }

        let rating = vital.classify(value);
        let result = self
            .record_metric(vital.as_str(), value, MetricPayload::WebVital { rating: Some(rating) })
            .await;

        self.telemetry.capture(
            TelemetryEvent::new(format!("Web Vital: {}", vital), TelemetryLevel::Info)
                .with_tag("metric", vital.as_str())
                .with_tag("value", value.to_string())
                .with_tag("rating", rating.to_string()),
        );

        result
    }

    /// Record a finished task as a `task_completion` event valued at its
    /// duration
    pub async fn record_task_completion(
        &self,
        task_id: impl Into<String>,
        success: bool,
        duration_ms: f64,
    ) -> Result<()> {
        let payload = MetricPayload::Task { task_id: Some(task_id.into()), success: Some(success) };
        self.record_metric(TASK_COMPLETION_METRIC, duration_ms, payload).await
    }

    /// Record one occurrence of an error, named by its type
    pub async fn record_error(
        &self,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<()> {
        let payload = MetricPayload::Error { message: Some(message.into()) };
        self.record_metric(error_type, 1.0, payload).await
    }

    /// Record elapsed time until the user reached a meaningful outcome
    pub async fn record_time_to_value(&self, duration_ms: f64, step: Option<String>) -> Result<()> {
        self.record_metric(TIME_TO_VALUE_METRIC, duration_ms, MetricPayload::Ux { step }).await
    }

    /// Latest value per vital
    pub fn web_vitals(&self) -> WebVitalsSnapshot {
        self.snapshot.lock().clone()
    }

    /// Wait up to `timeout` for telemetry still in flight
    pub async fn flush_telemetry(&self, timeout: Duration) {
        self.telemetry.flush(timeout).await;
    }

    /// Events recorded but not yet persisted
    pub fn pending_count(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Persisted events of this collector's store
    pub async fn load(&self) -> Vec<MetricEvent> {
        Self::load_metrics(self.store.as_ref()).await
    }

    /// Drop pending events and delete the persisted history
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.save_lock.lock().await;
        self.buffer.lock().clear();
        Self::clear_metrics(self.store.as_ref()).await
    }

    /// Vitals snapshot plus the persisted history
    ///
    /// Vitals this collector hasn't seen yet are restored from the newest
    /// stored `web_vital` event of each name, so a fresh process exports what
    /// earlier ones recorded.
    pub async fn export(&self) -> MetricsExport {
        let metrics = self.load().await;
        let web_vitals = self.restore_web_vitals(&metrics);
        MetricsExport { web_vitals, metrics, exported_at: self.now_utc() }
    }

    /// Analyze the persisted history, optionally against a baseline report
    pub async fn report(&self, baseline: Option<&AnalysisReport>) -> AnalysisReport {
        let metrics = self.load().await;
        MetricsAnalyzer::analyze_at(&metrics, baseline, self.now_utc())
    }

    /// All persisted events, or none if the stored value is missing or
    /// unreadable
    ///
    /// Individual entries that don't parse are skipped.
    pub async fn load_metrics(store: &dyn KeyValueStore) -> Vec<MetricEvent> {
        let raw = match store.get(METRICS_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "Failed to read persisted metrics");
                return Vec::new();
            }
        };

        let entries: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "Persisted metrics are unreadable, treating as empty");
                return Vec::new();
            }
        };

        let total = entries.len();
        let events: Vec<MetricEvent> =
            entries.into_iter().filter_map(|entry| serde_json::from_value(entry).ok()).collect();
        if events.len() < total {
            warn!(skipped = total - events.len(), "Skipped unreadable persisted metric entries");
        }
        events
    }

    /// Delete the persisted history
    pub async fn clear_metrics(store: &dyn KeyValueStore) -> Result<()> {
        store.remove(METRICS_STORAGE_KEY).await?;
        info!("Persisted metrics cleared");
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        let _guard = self.save_lock.lock().await;

        let pending = self.buffer.lock().clone();
        if pending.is_empty() {
            return Ok(());
        }

        let max_entries = self.config.max_entries;
        let batch = pending.clone();
        let saved = self
            .store
            .update(
                METRICS_STORAGE_KEY,
                Box::new(move |existing| merge_and_trim(existing, batch, max_entries)),
            )
            .await;

        match saved {
            Ok(()) => {
                // Only saves drain the buffer and saves are serialized, so the
                // persisted events are still at the front.
                let mut buffer = self.buffer.lock();
                let persisted = pending.len().min(buffer.len());
                buffer.drain(..persisted);
                debug!(saved = pending.len(), "Metrics persisted");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, pending = pending.len(), "Failed to persist metrics, keeping buffer");
                Err(err)
            }
        }
    }

    fn restore_web_vitals(&self, metrics: &[MetricEvent]) -> WebVitalsSnapshot {
        let mut snapshot = self.snapshot.lock();
        for (vital, value) in latest_web_vitals(metrics) {
            snapshot.entry(vital).or_insert(value);
        }
        snapshot.clone()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }
}

/// Last value per vital among stored `web_vital` events (oldest first)
fn latest_web_vitals(metrics: &[MetricEvent]) -> WebVitalsSnapshot {
    metrics
        .iter()
        .filter(|event| event.is_category(MetricCategory::WebVital))
        .filter_map(|event| Some((event.name.parse::<VitalName>().ok()?, event.value)))
        .collect()
}

/// Append `batch` to the stored JSON array and keep the newest `max_entries`
///
/// Stored entries are handled as raw JSON so that entries this version can't
/// parse survive the rewrite. An unreadable stored value is replaced.
fn merge_and_trim(
    existing: Option<String>,
    batch: Vec<MetricEvent>,
    max_entries: usize,
) -> Result<String> {
    let mut all: Vec<Value> = match existing.as_deref() {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|err| {
            warn!(error = %err, "Replacing unreadable persisted metrics");
            Vec::new()
        }),
        None => Vec::new(),
    };

    for event in batch {
        all.push(serde_json::to_value(event)?);
    }

    if all.len() > max_entries {
        let excess = all.len() - max_entries;
        all.drain(..excess);
    }

    Ok(serde_json::to_string(&all)?)
}

#[cfg(test)]
mod tests {
    use vitalscope_domain::MetricCategory;

    use super::*;

    fn event(name: &str, timestamp: i64) -> MetricEvent {
        MetricEvent {
            name: name.to_string(),
            value: 1.0,
            timestamp,
            url: "app://test".to_string(),
            payload: MetricPayload::empty(MetricCategory::Performance),
        }
    }

    #[test]
    fn merge_appends_in_order() {
        let existing = serde_json::to_string(&vec![event("a", 1)]).unwrap();
        let merged = merge_and_trim(Some(existing), vec![event("b", 2), event("c", 3)], 10).unwrap();

        let events: Vec<MetricEvent> = serde_json::from_str(&merged).unwrap();
        let names: Vec<_> = events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn merge_evicts_oldest_first() {
        let existing: Vec<_> = (0..5).map(|i| event(&format!("old-{i}"), i)).collect();
        let merged = merge_and_trim(
            Some(serde_json::to_string(&existing).unwrap()),
            vec![event("new", 99)],
            3,
        )
        .unwrap();

        let events: Vec<MetricEvent> = serde_json::from_str(&merged).unwrap();
        let names: Vec<_> = events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["old-3", "old-4", "new"]);
    }

    #[test]
    fn merge_replaces_corrupt_value() {
        let merged = merge_and_trim(Some("{not json".to_string()), vec![event("a", 1)], 10).unwrap();
        let events: Vec<MetricEvent> = serde_json::from_str(&merged).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn merge_keeps_entries_it_cannot_parse() {
        let existing = r#"[{"category":"custom","name":"x","value":1,"timestamp":0,"url":"u"}]"#;
        let merged = merge_and_trim(Some(existing.to_string()), vec![event("a", 1)], 10).unwrap();

        let raw: Vec<Value> = serde_json::from_str(&merged).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0]["category"], "custom");
    }
}
