//! Integration tests for the persisted and exported JSON shapes

use chrono::{TimeZone, Utc};
use serde_json::json;
use vitalscope_domain::{
    AnalysisReport, MetricCategory, MetricEvent, MetricPayload, MetricsExport, VitalName,
    VitalStatus, WebVitalsSnapshot,
};

fn web_vital(name: VitalName, value: f64, timestamp: i64) -> MetricEvent {
    MetricEvent {
        name: name.to_string(),
        value,
        timestamp,
        url: "app://vitalscope".to_string(),
        payload: MetricPayload::WebVital { rating: Some(name.classify(value)) },
    }
}

#[test]
fn stored_array_loads_mixed_categories() {
    let stored = json!([
        { "category": "web_vital", "name": "LCP", "value": 2100.0, "timestamp": 1, "url": "u", "rating": "good" },
        { "category": "ux", "name": "TTV", "value": 45000, "timestamp": 2, "url": "u" },
        { "category": "task", "name": "task_completion", "value": 800, "timestamp": 3, "url": "u", "task_id": "t1", "success": false },
        { "category": "performance", "name": "render", "value": 16.4, "timestamp": 4, "url": "u", "unit": "ms" }
    ]);

    let events: Vec<MetricEvent> = serde_json::from_value(stored).unwrap();
    let categories: Vec<_> = events.iter().map(MetricEvent::category).collect();

    assert_eq!(
        categories,
        vec![
            MetricCategory::WebVital,
            MetricCategory::Ux,
            MetricCategory::Task,
            MetricCategory::Performance
        ]
    );
    assert_eq!(events[0].payload, MetricPayload::WebVital { rating: Some(VitalStatus::Good) });
    assert_eq!(events[2].task_success(), Some(false));
}

#[test]
fn unknown_category_is_rejected() {
    let raw = json!({ "category": "custom", "name": "x", "value": 1, "timestamp": 0, "url": "u" });
    assert!(serde_json::from_value::<MetricEvent>(raw).is_err());
}

#[test]
fn export_has_expected_top_level_shape() {
    let snapshot: WebVitalsSnapshot = [(VitalName::Cls, 0.02)].into();
    let export = MetricsExport {
        web_vitals: snapshot,
        metrics: vec![web_vital(VitalName::Cls, 0.02, 5)],
        exported_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    };

    let value = serde_json::to_value(&export).unwrap();
    assert_eq!(value["web_vitals"]["CLS"], 0.02);
    assert_eq!(value["metrics"][0]["category"], "web_vital");
    assert_eq!(value["exported_at"], "2024-03-01T12:00:00Z");

    let parsed: MetricsExport = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, export);
}

#[test]
fn empty_object_is_a_valid_baseline() {
    let baseline: AnalysisReport = serde_json::from_str("{}").unwrap();
    assert!(baseline.web_vitals.is_empty());
    assert_eq!(baseline.task_performance.total, 0);
    assert!(baseline.regression.is_none());
}
