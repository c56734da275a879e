//! Application context - dependency injection container
//!
//! Owns the collector, survey service and their adapters. Every public
//! operation of the application goes through here. There is no global
//! instance: callers construct one and keep it for as long as they collect.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};
use vitalscope_common::time::{Clock, SystemClock};
use vitalscope_core::{
    CollectorConfig, KeyValueStore, MetricsCollector, ObserverHandle, PerformanceEntrySource,
    SurveyService, TelemetrySink, WebVitalsObserver,
};
use vitalscope_domain::constants::METRICS_STORAGE_KEY;
use vitalscope_domain::{
    AnalysisReport, Config, MetricPayload, MetricsExport, NpsResult, NpsSummary, PerformanceEntry,
    Result, SusResult, SusSummary, VitalName, WebVitalsSnapshot,
};
use vitalscope_infra::{build_sink, build_store, config, ChannelEntrySource};

use crate::utils::health::{ComponentHealth, HealthStatus};
use crate::utils::logging::error_label;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub collector: Arc<MetricsCollector>,
    pub surveys: Arc<SurveyService>,
    observer: Mutex<Option<ObserverHandle>>,
}

/// Outcome of replaying a batch of performance entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestSummary {
    pub entries: usize,
    pub delivered: usize,
    pub unsupported_vitals: Vec<VitalName>,
    /// Vitals snapshot after the replay
    pub web_vitals: WebVitalsSnapshot,
}

/// Both survey summaries, `None` where no responses exist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveySummary {
    pub sus: Option<SusSummary>,
    pub nps: Option<NpsSummary>,
}

impl AppContext {
    /// Build from the probed config file and `VITALSCOPE_*` environment
    pub fn new() -> Result<Self> {
        Self::new_with_config(config::load()?)
    }

    pub fn new_with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let store = build_store(&config.storage)?;
        let telemetry = build_sink(&config.telemetry)?;
        Ok(Self::from_parts(config, store, telemetry, Arc::new(SystemClock)))
    }

    /// Assemble from explicit adapters
    pub fn from_parts(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        telemetry: Arc<dyn TelemetrySink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let collector = Arc::new(MetricsCollector::new(
            Arc::clone(&store),
            telemetry,
            Arc::clone(&clock),
            CollectorConfig::from_config(&config),
        ));
        let surveys = Arc::new(SurveyService::new(Arc::clone(&store), clock));

        if config.collection.auto_start {
            collector.start();
        }

        info!(
            backend = %config.storage.backend,
            auto_start = config.collection.auto_start,
            "application context ready"
        );

        Self { config, store, collector, surveys, observer: Mutex::new(None) }
    }

    pub fn start_metrics_collection(&self) {
        self.collector.start();
    }

    /// Stop recording and detach any running observer
    pub fn stop_metrics_collection(&self) {
        self.collector.stop();
        if let Some(handle) = self.observer.lock().take() {
            handle.shutdown();
        }
    }

    pub fn is_collecting(&self) -> bool {
        self.collector.is_started()
    }

    /// Observe web vitals from `source` until collection stops
    ///
    /// Replaces any observer attached earlier. Returns the vitals that could
    /// not be observed. Must be called from within a tokio runtime.
    pub fn observe_web_vitals(&self, source: &dyn PerformanceEntrySource) -> Vec<VitalName> {
        let handle = WebVitalsObserver::new(Arc::clone(&self.collector)).observe(source);
        let failed = handle.failed_vitals().to_vec();

        if let Some(previous) = self.observer.lock().replace(handle) {
            debug!("replacing running web vitals observer");
            previous.shutdown();
        }
        failed
    }

    /// Record a metric; failures are logged and never returned
    pub async fn record_metric(&self, name: &str, value: f64, payload: MetricPayload) {
        log_failure("record_metric", self.collector.record_metric(name, value, payload).await);
    }

    pub async fn record_web_vital(&self, vital: VitalName, value: f64) {
        log_failure("record_web_vital", self.collector.record_web_vital(vital, value).await);
    }

    pub async fn record_task_completion(&self, task_id: &str, success: bool, duration_ms: f64) {
        log_failure(
            "record_task_completion",
            self.collector.record_task_completion(task_id, success, duration_ms).await,
        );
    }

    pub async fn record_error(&self, error_type: &str, message: &str) {
        log_failure("record_error", self.collector.record_error(error_type, message).await);
    }

    pub async fn record_time_to_value(&self, duration_ms: f64, step: Option<String>) {
        log_failure(
            "record_time_to_value",
            self.collector.record_time_to_value(duration_ms, step).await,
        );
    }

    /// Replay recorded performance entries through a fresh observer
    ///
    /// Waits until every entry has been tracked. Does nothing to the
    /// observer attached with [`Self::observe_web_vitals`].
    pub async fn ingest_performance_entries(&self, entries: Vec<PerformanceEntry>) -> IngestSummary {
        let source = ChannelEntrySource::new(self.config.collection.channel_capacity);
        let handle = WebVitalsObserver::new(Arc::clone(&self.collector)).observe(&source);
        let unsupported_vitals = handle.failed_vitals().to_vec();

        let total = entries.len();
        let mut delivered = 0;
        for entry in entries {
            if source.publish(entry).await > 0 {
                delivered += 1;
            }
        }
        source.close();
        handle.join().await;

        info!(entries = total, delivered, "performance entries ingested");

        IngestSummary {
            entries: total,
            delivered,
            unsupported_vitals,
            web_vitals: self.collector.web_vitals(),
        }
    }

    pub async fn get_metrics_report(&self, baseline: Option<&AnalysisReport>) -> AnalysisReport {
        self.collector.report(baseline).await
    }

    pub async fn export_metrics_data(&self) -> MetricsExport {
        self.collector.export().await
    }

    pub async fn clear_metrics(&self) -> Result<()> {
        self.collector.clear().await
    }

    pub async fn submit_sus(&self, answers: &[u8]) -> Result<SusResult> {
        self.surveys.submit_sus(answers).await
    }

    pub async fn submit_nps(&self, score: u8, feedback: Option<String>) -> Result<NpsResult> {
        self.surveys.submit_nps(score, feedback).await
    }

    pub async fn survey_summary(&self) -> SurveySummary {
        SurveySummary {
            sus: self.surveys.sus_summary().await,
            nps: self.surveys.nps_summary().await,
        }
    }

    /// Check each component; the store is probed with a read
    pub async fn health_check(&self) -> HealthStatus {
        let storage = match self.store.get(METRICS_STORAGE_KEY).await {
            Ok(_) => ComponentHealth::healthy("storage"),
            Err(err) => {
                warn!(error = %err, "storage health check failed");
                ComponentHealth::unhealthy("storage", err.to_string())
            }
        };

        let pending = self.collector.pending_count();
        let collector = if pending == 0 {
            ComponentHealth::healthy("collector")
        } else {
            ComponentHealth::unhealthy("collector", format!("{pending} events not persisted"))
        };

        let mut status = HealthStatus::new().add_component(storage).add_component(collector);
        status.calculate_score();
        status
    }

    /// Detach the observer, wait for in-flight telemetry and report anything
    /// left unsaved
    ///
    /// Telemetry gets at most `telemetry.timeout_ms` to drain.
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutdown called on AppContext");
        self.stop_metrics_collection();
        self.collector
            .flush_telemetry(Duration::from_millis(self.config.telemetry.timeout_ms))
            .await;

        let pending = self.collector.pending_count();
        if pending > 0 {
            warn!(pending, "metric events were never persisted");
        }
        Ok(())
    }
}

fn log_failure(operation: &'static str, result: Result<()>) {
    if let Err(err) = result {
        warn!(operation, error_type = error_label(&err), error = %err, "metric recording failed");
    }
}
