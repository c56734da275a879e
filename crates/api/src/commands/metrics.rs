//! Metric collection and reporting commands

use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;
use vitalscope_domain::{
    AnalysisReport, MetricCategory, MetricPayload, PerformanceEntry, Result, VitalName,
    VitalScopeError,
};
use vitalscope_infra::InfraError;

use crate::context::AppContext;

pub async fn report(context: &AppContext, baseline: Option<&Path>) -> Result<Value> {
    let baseline = baseline.map(read_baseline).transpose()?;
    let report = context.get_metrics_report(baseline.as_ref()).await;
    Ok(serde_json::to_value(report)?)
}

pub async fn export(context: &AppContext) -> Result<Value> {
    Ok(serde_json::to_value(context.export_metrics_data().await)?)
}

pub async fn clear(context: &AppContext) -> Result<Value> {
    context.clear_metrics().await?;
    Ok(json!({ "cleared": true }))
}

/// Web vital names go through the vitals snapshot; everything else is
/// recorded with an empty payload of the given category
pub async fn record(
    context: &AppContext,
    category: MetricCategory,
    name: &str,
    value: f64,
) -> Result<Value> {
    match (category, name.parse::<VitalName>()) {
        (MetricCategory::WebVital, Ok(vital)) => context.record_web_vital(vital, value).await,
        _ => context.record_metric(name, value, MetricPayload::empty(category)).await,
    }
    Ok(recorded(context, name))
}

pub async fn task(
    context: &AppContext,
    task_id: &str,
    success: bool,
    duration_ms: f64,
) -> Result<Value> {
    context.record_task_completion(task_id, success, duration_ms).await;
    Ok(recorded(context, task_id))
}

pub async fn error(context: &AppContext, error_type: &str, message: &str) -> Result<Value> {
    context.record_error(error_type, message).await;
    Ok(recorded(context, error_type))
}

pub async fn time_to_value(
    context: &AppContext,
    duration_ms: f64,
    step: Option<String>,
) -> Result<Value> {
    context.record_time_to_value(duration_ms, step).await;
    Ok(recorded(context, "TTV"))
}

pub async fn ingest(context: &AppContext, path: &Path) -> Result<Value> {
    let entries = read_entries(path)?;
    let summary = context.ingest_performance_entries(entries).await;
    Ok(serde_json::to_value(summary)?)
}

pub async fn health(context: &AppContext) -> Result<Value> {
    Ok(serde_json::to_value(context.health_check().await)?)
}

fn recorded(context: &AppContext, name: &str) -> Value {
    json!({ "recorded": name, "collecting": context.is_collecting() })
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| VitalScopeError::from(InfraError::from(e)))
}

fn read_baseline(path: &Path) -> Result<AnalysisReport> {
    let raw = read_file(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        VitalScopeError::InvalidInput(format!("baseline {} is not a report: {e}", path.display()))
    })
}

/// One JSON entry per line; blank lines are skipped
fn read_entries(path: &Path) -> Result<Vec<PerformanceEntry>> {
    let raw = read_file(path)?;
    let mut entries = Vec::new();

    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry = serde_json::from_str(line).map_err(|e| {
            VitalScopeError::InvalidInput(format!("{}:{}: {e}", path.display(), index + 1))
        })?;
        entries.push(entry);
    }

    debug!(path = %path.display(), entries = entries.len(), "performance entries read");
    Ok(entries)
}
