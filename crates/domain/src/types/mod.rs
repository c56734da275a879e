//! Domain types and models

pub mod export;
pub mod metric;
pub mod performance;
pub mod report;
pub mod survey;
pub mod vitals;

pub use export::MetricsExport;
pub use metric::{MetricCategory, MetricEvent, MetricPayload};
pub use performance::{EntryType, PerformanceEntry};
pub use report::{
    AnalysisReport, ErrorSummary, PerformanceStats, Priority, Recommendation, RegressionReport,
    ReportStatus, ReportSummary, SuccessRateRegression, TaskPerformance, TimeRange, Trend,
    TrendReport, TtvStats, UxMetrics, VitalRegression, VitalStats,
};
pub use survey::{NpsCategory, NpsResult, NpsSummary, SusGrade, SusResult, SusSummary};
pub use vitals::{VitalName, VitalStatus, VitalThresholds, WebVitalsSnapshot};
