//! Application commands
//!
//! One variant per CLI subcommand. [`execute`] runs a command against an
//! [`AppContext`] and returns the JSON value to print.

pub mod metrics;
pub mod surveys;

use std::path::PathBuf;
use std::time::Instant;

use clap::{ArgAction, Subcommand};
use serde_json::Value;
use vitalscope_domain::{MetricCategory, Result};

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Analyze the stored metrics, optionally against a baseline report
    Report {
        /// JSON file holding an earlier report
        baseline: Option<PathBuf>,
    },
    /// Print the vitals snapshot and stored metrics
    Export,
    /// Delete every stored metric
    Clear,
    /// Record a metric of any category
    Record {
        /// web_vital, ux, task, error or performance
        category: MetricCategory,
        name: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Record a task completion
    Task {
        task_id: String,
        #[arg(action = ArgAction::Set, value_parser = parse_success)]
        success: bool,
        duration_ms: f64,
    },
    /// Record an application error
    Error { error_type: String, message: String },
    /// Record a time-to-value measurement
    Ttv { duration_ms: f64, step: Option<String> },
    /// Replay performance entries from a JSON Lines file
    Ingest { entries: PathBuf },
    /// Submit a System Usability Scale response (ten answers, 1-5)
    Sus {
        #[arg(required = true)]
        answers: Vec<u8>,
    },
    /// Submit a Net Promoter Score response
    Nps { score: u8, feedback: Option<String> },
    /// Summarise survey responses
    Surveys,
    /// Check storage and collector health
    Health,
}

impl Command {
    /// Stable identifier used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Report { .. } => "metrics::report",
            Self::Export => "metrics::export",
            Self::Clear => "metrics::clear",
            Self::Record { .. } => "metrics::record",
            Self::Task { .. } => "metrics::task",
            Self::Error { .. } => "metrics::error",
            Self::Ttv { .. } => "metrics::ttv",
            Self::Ingest { .. } => "metrics::ingest",
            Self::Sus { .. } => "surveys::sus",
            Self::Nps { .. } => "surveys::nps",
            Self::Surveys => "surveys::summary",
            Self::Health => "app::health",
        }
    }
}

/// Run `command` and return its JSON output
pub async fn execute(context: &AppContext, command: Command) -> Result<Value> {
    let command_name = command.name();
    let start = Instant::now();

    let result = match command {
        Command::Report { baseline } => metrics::report(context, baseline.as_deref()).await,
        Command::Export => metrics::export(context).await,
        Command::Clear => metrics::clear(context).await,
        Command::Record { category, name, value } => {
            metrics::record(context, category, &name, value).await
        }
        Command::Task { task_id, success, duration_ms } => {
            metrics::task(context, &task_id, success, duration_ms).await
        }
        Command::Error { error_type, message } => {
            metrics::error(context, &error_type, &message).await
        }
        Command::Ttv { duration_ms, step } => metrics::time_to_value(context, duration_ms, step).await,
        Command::Ingest { entries } => metrics::ingest(context, &entries).await,
        Command::Sus { answers } => surveys::sus(context, &answers).await,
        Command::Nps { score, feedback } => surveys::nps(context, score, feedback).await,
        Command::Surveys => surveys::summary(context).await,
        Command::Health => metrics::health(context).await,
    };

    log_command_execution(command_name, start.elapsed(), result.is_ok());
    result
}

fn parse_success(raw: &str) -> std::result::Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "success" => Ok(true),
        "false" | "0" | "no" | "failure" => Ok(false),
        other => Err(format!("expected true or false, got '{other}'")),
    }
}
