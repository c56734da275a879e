//! Metric analysis and recommendations

pub mod analyzer;
pub mod recommendations;

pub use analyzer::MetricsAnalyzer;
pub use recommendations::recommend;
