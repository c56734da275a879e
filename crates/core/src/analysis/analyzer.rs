//! Metrics analyzer - reduces a metric history into an [`AnalysisReport`]

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use vitalscope_common::stats::{format_fixed2, mean, median, percentile, round2};
use vitalscope_common::time::utc_date_key;
use vitalscope_common::SampleSummary;
use vitalscope_domain::constants::{
    TASK_SUCCESS_EXCELLENT, TASK_SUCCESS_GOOD, TIME_TO_VALUE_METRIC, TTV_GOOD_THRESHOLD_MS,
};
use vitalscope_domain::{
    AnalysisReport, ErrorSummary, MetricCategory, MetricEvent, PerformanceStats, RegressionReport,
    ReportStatus, ReportSummary, SuccessRateRegression, TaskPerformance, TimeRange, Trend,
    TrendReport, TtvStats, UxMetrics, VitalName, VitalRegression, VitalStats,
};

use super::recommendations::recommend;

/// Stateless reducer over a metric history
///
/// Empty inputs never fail: sections without samples carry `None` values and
/// an `N/A` status.
pub struct MetricsAnalyzer;

impl MetricsAnalyzer {
    /// Analyze `metrics`, comparing against `baseline` when given
    pub fn analyze(metrics: &[MetricEvent], baseline: Option<&AnalysisReport>) -> AnalysisReport {
        Self::analyze_at(metrics, baseline, Utc::now())
    }

    /// [`analyze`](Self::analyze) with an explicit generation time
    pub fn analyze_at(
        metrics: &[MetricEvent],
        baseline: Option<&AnalysisReport>,
        generated_at: DateTime<Utc>,
    ) -> AnalysisReport {
        let web_vitals: BTreeMap<VitalName, VitalStats> =
            VitalName::ALL.into_iter().map(|vital| (vital, vital_stats(metrics, vital))).collect();
        let ux_metrics = UxMetrics { ttv: ttv_stats(metrics) };
        let task_performance = task_performance(metrics);
        let errors = error_summary(metrics);

        let mut report = AnalysisReport {
            generated_at,
            summary: summary(metrics),
            web_vitals,
            ux_metrics,
            task_performance,
            errors,
            trends: trends(metrics),
            regression: None,
            recommendations: Vec::new(),
            performance: performance_stats(metrics),
        };

        report.regression = baseline.map(|baseline| regression(&report, baseline));
        report.recommendations = recommend(&report);
        report
    }
}

fn values_where(metrics: &[MetricEvent], predicate: impl Fn(&MetricEvent) -> bool) -> Vec<f64> {
    metrics.iter().filter(|&event| predicate(event)).map(|event| event.value).collect()
}

fn summary(metrics: &[MetricEvent]) -> ReportSummary {
    let categories: BTreeSet<MetricCategory> = metrics.iter().map(MetricEvent::category).collect();

    let start = metrics.iter().map(|event| event.timestamp).min();
    let end = metrics.iter().map(|event| event.timestamp).max();
    let time_range = start.zip(end).map(|(start, end)| TimeRange { start, end });

    ReportSummary { total_metrics: metrics.len(), categories: categories.into_iter().collect(), time_range }
}

fn vital_stats(metrics: &[MetricEvent], vital: VitalName) -> VitalStats {
    let samples = values_where(metrics, |event| {
        event.is_category(MetricCategory::WebVital) && event.name == vital.as_str()
    });

    let average = mean(&samples);
    VitalStats {
        count: samples.len(),
        current: samples.last().copied(),
        average,
        median: median(&samples),
        p90: percentile(&samples, 90.0),
        p95: percentile(&samples, 95.0),
        status: average.map_or(ReportStatus::NotAvailable, |avg| vital.classify(avg).into()),
    }
}

fn ttv_stats(metrics: &[MetricEvent]) -> TtvStats {
    let samples = values_where(metrics, |event| {
        event.is_category(MetricCategory::Ux) && event.name == TIME_TO_VALUE_METRIC
    });

    let average = mean(&samples);
    let status = match average {
        None => ReportStatus::NotAvailable,
        Some(avg) if avg < TTV_GOOD_THRESHOLD_MS => ReportStatus::Good,
        Some(_) => ReportStatus::NeedsImprovement,
    };

    TtvStats {
        count: samples.len(),
        average,
        median: median(&samples),
        p90: percentile(&samples, 90.0),
        status,
    }
}

fn task_performance(metrics: &[MetricEvent]) -> TaskPerformance {
    let tasks: Vec<&MetricEvent> =
        metrics.iter().filter(|event| event.is_category(MetricCategory::Task)).collect();
    if tasks.is_empty() {
        return TaskPerformance::default();
    }

    let total = tasks.len();
    let successful = tasks.iter().filter(|event| event.task_success() == Some(true)).count();
    let success_rate = round2(successful as f64 / total as f64 * 100.0);
    let durations: Vec<f64> = tasks.iter().map(|event| event.value).collect();

    let status = if success_rate >= TASK_SUCCESS_EXCELLENT {
        ReportStatus::Excellent
    } else if success_rate >= TASK_SUCCESS_GOOD {
        ReportStatus::Good
    } else {
        ReportStatus::NeedsImprovement
    };

    TaskPerformance {
        total,
        successful,
        success_rate,
        average_duration: mean(&durations),
        median_duration: median(&durations),
        status,
    }
}

fn error_summary(metrics: &[MetricEvent]) -> ErrorSummary {
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for event in metrics.iter().filter(|event| event.is_category(MetricCategory::Error)) {
        *by_type.entry(event.name.clone()).or_default() += 1;
    }

    let total: usize = by_type.values().sum();
    let rate = if metrics.is_empty() { 0.0 } else { total as f64 / metrics.len() as f64 * 100.0 };

    ErrorSummary { total, by_type, error_rate: format_fixed2(rate) }
}

fn trends(metrics: &[MetricEvent]) -> TrendReport {
    let mut daily_counts: BTreeMap<String, usize> = BTreeMap::new();
    for event in metrics {
        *daily_counts.entry(utc_date_key(event.timestamp)).or_default() += 1;
    }

    let trend = if daily_counts.len() >= 2 {
        let first = daily_counts.values().next().copied().unwrap_or_default();
        let last = daily_counts.values().next_back().copied().unwrap_or_default();
        Some(if last > first {
            Trend::Increasing
        } else if last < first {
            Trend::Decreasing
        } else {
            Trend::Stable
        })
    } else {
        None
    };

    TrendReport { daily_counts, trend }
}

fn regression(current: &AnalysisReport, baseline: &AnalysisReport) -> RegressionReport {
    let web_vitals = VitalName::ALL
        .into_iter()
        .filter_map(|vital| {
            let base = baseline.web_vitals.get(&vital)?.average?;
            let now = current.web_vitals.get(&vital)?.average?;
            if base == 0.0 {
                return None;
            }

            let regression = VitalRegression {
                baseline: base,
                current: now,
                change_percent: round2((now - base) / base * 100.0),
                improved: now < base,
            };
            Some((vital, regression))
        })
        .collect();

    let task_success_rate = (baseline.task_performance.total > 0
        && current.task_performance.total > 0)
        .then(|| {
            let base = baseline.task_performance.success_rate;
            let now = current.task_performance.success_rate;
            SuccessRateRegression {
                baseline: base,
                current: now,
                change: round2(now - base),
                improved: now > base,
            }
        });

    RegressionReport { web_vitals, task_success_rate }
}

fn performance_stats(metrics: &[MetricEvent]) -> BTreeMap<String, PerformanceStats> {
    let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for event in metrics.iter().filter(|event| event.is_category(MetricCategory::Performance)) {
        samples.entry(event.name.as_str()).or_default().push(event.value);
    }

    samples
        .into_iter()
        .filter_map(|(name, values)| {
            let summary = SampleSummary::from_samples(&values)?;
            let stats = PerformanceStats {
                count: summary.count,
                average: summary.average,
                median: summary.median,
                p95: summary.p95,
            };
            Some((name.to_string(), stats))
        })
        .collect()
}
