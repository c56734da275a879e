//! Rule-based recommendations derived from a finished report

use vitalscope_domain::constants::{ERROR_RATE_ALERT_PERCENT, TASK_SUCCESS_EXCELLENT, TASK_SUCCESS_GOOD};
use vitalscope_domain::{
    AnalysisReport, MetricCategory, Priority, Recommendation, ReportStatus, VitalName,
};

/// Recommendations for every section of `report` that misses its target
///
/// Order is stable: vitals (LCP, CLS, INP, FCP, TTFB), task success, errors,
/// then time-to-value.
pub fn recommend(report: &AnalysisReport) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for vital in VitalName::ALL {
        let Some(stats) = report.web_vitals.get(&vital) else {
            continue;
        };
        let priority = match stats.status {
            ReportStatus::Poor => Priority::High,
            ReportStatus::NeedsImprovement => Priority::Medium,
            _ => continue,
        };
        let Some(average) = stats.average else {
            continue;
        };

        recommendations.push(Recommendation {
            category: MetricCategory::WebVital,
            priority,
            metric: vital.to_string(),
            issue: format!("{} averages {} ({})", vital, format_vital(vital, average), stats.status),
            suggestion: vital_suggestion(vital).to_string(),
        });
    }

    let tasks = &report.task_performance;
    if tasks.total > 0 && tasks.success_rate < TASK_SUCCESS_EXCELLENT {
        let priority =
            if tasks.success_rate < TASK_SUCCESS_GOOD { Priority::High } else { Priority::Medium };
        recommendations.push(Recommendation {
            category: MetricCategory::Task,
            priority,
            metric: "task_success_rate".to_string(),
            issue: format!(
                "Task success rate is {:.2}% ({} of {} tasks)",
                tasks.success_rate, tasks.successful, tasks.total
            ),
            suggestion: "Review the failing task flows and remove the steps where users get stuck."
                .to_string(),
        });
    }

    let error_rate = report.errors.error_rate_percent();
    if error_rate > ERROR_RATE_ALERT_PERCENT {
        recommendations.push(Recommendation {
            category: MetricCategory::Error,
            priority: Priority::High,
            metric: "error_rate".to_string(),
            issue: format!("Error rate is {}% of all recorded metrics", report.errors.error_rate),
            suggestion: "Investigate the most frequent error types and add handling for the failing paths."
                .to_string(),
        });
    }

    let ttv = &report.ux_metrics.ttv;
    if ttv.status == ReportStatus::NeedsImprovement {
        let minutes = ttv.average.unwrap_or_default() / 60_000.0;
        recommendations.push(Recommendation {
            category: MetricCategory::Ux,
            priority: Priority::Medium,
            metric: "TTV".to_string(),
            issue: format!("Time to value averages {:.1} minutes", minutes),
            suggestion: "Shorten onboarding so users reach their first meaningful outcome sooner."
                .to_string(),
        });
    }

    recommendations
}

fn format_vital(vital: VitalName, value: f64) -> String {
    match vital {
        VitalName::Cls => format!("{:.3}", value),
        _ => format!("{:.0}ms", value),
    }
}

fn vital_suggestion(vital: VitalName) -> &'static str {
    match vital {
        VitalName::Lcp => {
            "Optimize the largest above-the-fold element: compress hero images and preload critical resources."
        }
        VitalName::Cls => "Reserve space for images, embeds and late-loading content to avoid layout shifts.",
        VitalName::Inp => "Break up long tasks and defer non-critical JavaScript to keep interactions responsive.",
        VitalName::Fcp => "Remove render-blocking CSS and JavaScript so the first content paints sooner.",
        VitalName::Ttfb => "Improve server response time with caching or a CDN closer to users.",
    }
}
