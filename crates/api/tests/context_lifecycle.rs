//! Integration tests for AppContext lifecycle

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use support::{memory_context, sqlite_config, JAN_1};
use vitalscope_common::testing::TempDir;
use vitalscope_common::time::MockClock;
use vitalscope_core::{KeyValueStore, NoopTelemetrySink, UpdateFn};
use vitalscope_domain::{Config, MetricPayload, PerformanceEntry, Result, VitalName, VitalScopeError};
use vitalscope_infra::ChannelEntrySource;
use vitalscope_domain::MetricCategory;
use vitalscope_lib::{execute, AppContext, Command};

/// Store whose every operation fails
struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(VitalScopeError::Storage("disk unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<()> {
        Err(VitalScopeError::Storage("disk unavailable".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Err(VitalScopeError::Storage("disk unavailable".to_string()))
    }

    async fn update(&self, _key: &str, _mutator: UpdateFn) -> Result<()> {
        Err(VitalScopeError::Storage("disk unavailable".to_string()))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn sqlite_context_persists_across_instances() {
    let dir = TempDir::new("vitalscope-context").expect("temp dir");
    let config = sqlite_config(&dir);

    let first = AppContext::new_with_config(config.clone()).expect("context should start");
    assert!(first.is_collecting());
    first.record_task_completion("signup", true, 5400.0).await;
    first.shutdown().await.unwrap();
    drop(first);

    let second = AppContext::new_with_config(config).expect("context should reopen");
    let export = second.export_metrics_data().await;
    assert_eq!(export.metrics.len(), 1);
    assert_eq!(export.metrics[0].task_success(), Some(true));
}

#[tokio::test(flavor = "multi_thread")]
async fn export_in_a_new_context_shows_earlier_web_vitals() {
    let dir = TempDir::new("vitalscope-vitals").expect("temp dir");
    let config = sqlite_config(&dir);

    let first = AppContext::new_with_config(config.clone()).expect("context should start");
    let record = Command::Record {
        category: MetricCategory::WebVital,
        name: "LCP".to_string(),
        value: 1200.0,
    };
    execute(&first, record).await.unwrap();
    first.shutdown().await.unwrap();
    drop(first);

    let second = AppContext::new_with_config(config).expect("context should reopen");
    let export = execute(&second, Command::Export).await.unwrap();

    assert_eq!(export["metrics"].as_array().unwrap().len(), 1);
    assert_eq!(export["web_vitals"]["LCP"], 1200.0);
}

#[test]
fn zero_max_entries_is_rejected() {
    let mut config = Config::default();
    config.storage.backend = vitalscope_domain::StorageBackend::Memory;
    config.storage.max_entries = 0;

    let err = AppContext::new_with_config(config).err().expect("config should be rejected");
    assert!(matches!(err, VitalScopeError::Config(_)), "{err}");
}

#[tokio::test]
async fn stopped_context_records_nothing_until_restarted() {
    let (context, _) = memory_context();

    context.stop_metrics_collection();
    context.record_metric("bundle_size", 512.0, MetricPayload::Performance { unit: None }).await;
    assert!(context.export_metrics_data().await.metrics.is_empty());

    context.start_metrics_collection();
    context.record_metric("bundle_size", 512.0, MetricPayload::Performance { unit: None }).await;
    assert_eq!(context.export_metrics_data().await.metrics.len(), 1);
}

#[tokio::test]
async fn auto_start_can_be_disabled() {
    let mut config = Config::default();
    config.collection.auto_start = false;

    let context = AppContext::from_parts(
        config,
        Arc::new(vitalscope_infra::MemoryKeyValueStore::new()),
        Arc::new(NoopTelemetrySink),
        Arc::new(MockClock::at_millis(JAN_1)),
    );

    assert!(!context.is_collecting());
}

#[tokio::test]
async fn recording_failures_are_swallowed() {
    let context = AppContext::from_parts(
        Config::default(),
        Arc::new(BrokenStore),
        Arc::new(NoopTelemetrySink),
        Arc::new(MockClock::at_millis(JAN_1)),
    );

    context.record_error("NetworkError", "offline").await;
    context.record_web_vital(VitalName::Cls, 0.3).await;

    // The snapshot lives in memory and survives the failed saves.
    assert_eq!(context.export_metrics_data().await.web_vitals.get(&VitalName::Cls), Some(&0.3));
    assert!(context.export_metrics_data().await.metrics.is_empty());

    let health = context.health_check().await;
    assert!(!health.is_healthy);
    assert_eq!(health.score, 0.0);

    let cleared = context.clear_metrics().await;
    assert!(matches!(cleared, Err(VitalScopeError::Storage(_))));
    vitalscope_common::assert_error_contains!(cleared, "disk unavailable");
}

#[tokio::test]
async fn observer_feeds_collector() {
    let (context, _) = memory_context();
    let source = ChannelEntrySource::new(8);

    let unsupported = context.observe_web_vitals(&source);
    assert!(unsupported.is_empty());

    source
        .publish(PerformanceEntry::Navigation { request_start: 10.0, response_start: 210.0 })
        .await;

    for _ in 0..50 {
        if context.export_metrics_data().await.web_vitals.contains_key(&VitalName::Ttfb) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(
        context.export_metrics_data().await.web_vitals.get(&VitalName::Ttfb),
        Some(&200.0)
    );

    context.stop_metrics_collection();
    assert!(!context.is_collecting());
}

#[tokio::test]
async fn healthy_context_reports_every_component() {
    let (context, _) = memory_context();
    let health = context.health_check().await;

    assert!(health.is_healthy);
    let names: Vec<_> = health.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["storage", "collector"]);
}

#[test]
fn shutdown_delivers_telemetry_before_the_runtime_exits() {
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server_runtime = tokio::runtime::Runtime::new().unwrap();
    let server = server_runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/telemetry"))
            .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(50)))
            .mount(&server)
            .await;
        server
    });

    let mut config = Config::default();
    config.storage.backend = vitalscope_domain::StorageBackend::Memory;
    config.telemetry.enabled = true;
    config.telemetry.endpoint = Some(format!("{}/telemetry", server.uri()));

    // Same shape as the binary: one command, shutdown, runtime dropped.
    let app_runtime = tokio::runtime::Runtime::new().unwrap();
    app_runtime.block_on(async {
        let context = AppContext::new_with_config(config).expect("context should start");
        let record = Command::Record {
            category: MetricCategory::WebVital,
            name: "LCP".to_string(),
            value: 2100.0,
        };
        execute(&context, record).await.unwrap();
        context.shutdown().await.unwrap();
    });
    drop(app_runtime);

    let received = server_runtime.block_on(server.received_requests()).unwrap();
    assert_eq!(received.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["message"], "Web Vital: LCP");
}
