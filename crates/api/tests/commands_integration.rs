//! End-to-end tests for the application commands

mod support;

use clap::Parser;
use serde_json::Value;
use support::{memory_context, sqlite_config};
use vitalscope_common::testing::{assert_approx_eq, TempDir};
use vitalscope_domain::{MetricCategory, VitalScopeError};
use vitalscope_lib::{execute, AppContext, Command};

#[derive(Parser)]
struct TestCli {
    #[command(subcommand)]
    command: Command,
}

fn parse(args: &[&str]) -> Command {
    let argv = std::iter::once("vitalscope").chain(args.iter().copied());
    TestCli::try_parse_from(argv).expect("arguments should parse").command
}

async fn run(context: &AppContext, args: &[&str]) -> Value {
    execute(context, parse(args)).await.expect("command should succeed")
}

#[test]
fn cli_arguments_map_onto_commands() {
    assert_eq!(
        parse(&["record", "web_vital", "LCP", "2100"]),
        Command::Record { category: MetricCategory::WebVital, name: "LCP".into(), value: 2100.0 }
    );
    assert_eq!(
        parse(&["task", "checkout", "failure", "950"]),
        Command::Task { task_id: "checkout".into(), success: false, duration_ms: 950.0 }
    );
    assert_eq!(
        parse(&["nps", "9", "great tool"]),
        Command::Nps { score: 9, feedback: Some("great tool".into()) }
    );
    assert_eq!(parse(&["report"]), Command::Report { baseline: None });

    let argv = ["vitalscope", "task", "checkout", "maybe", "950"];
    assert!(TestCli::try_parse_from(argv).is_err());
    assert!(TestCli::try_parse_from(["vitalscope", "sus"]).is_err());
}

#[tokio::test]
async fn task_success_rate_reaches_excellent() {
    let (context, _) = memory_context();

    for i in 0..10 {
        let outcome = if i == 0 { "false" } else { "true" };
        let duration = (1000 + i * 100).to_string();
        let out = run(&context, &["task", "onboarding", outcome, &duration]).await;
        assert_eq!(out["recorded"], "onboarding");
    }

    let report = run(&context, &["report"]).await;
    let tasks = &report["task_performance"];
    assert_eq!(tasks["total"], 10);
    assert_eq!(tasks["successful"], 9);
    assert_eq!(tasks["success_rate"], 90.0);
    assert_eq!(tasks["status"], "excellent");
}

#[tokio::test]
async fn report_compares_against_baseline_file() {
    let dir = TempDir::new("vitalscope-baseline").expect("temp dir");
    let baseline_path = dir.join("baseline.json");

    let (before, _) = memory_context();
    run(&before, &["record", "web_vital", "LCP", "3000"]).await;
    let baseline = run(&before, &["report"]).await;
    assert_eq!(baseline["web_vitals"]["LCP"]["status"], "needs_improvement");
    std::fs::write(&baseline_path, serde_json::to_string_pretty(&baseline).unwrap()).unwrap();

    let (after, _) = memory_context();
    run(&after, &["record", "web_vital", "LCP", "2000"]).await;
    let path = baseline_path.display().to_string();
    let report = run(&after, &["report", &path]).await;

    let lcp = &report["regression"]["web_vitals"]["LCP"];
    assert_eq!(lcp["baseline"], 3000.0);
    assert_eq!(lcp["current"], 2000.0);
    assert_approx_eq(lcp["change_percent"].as_f64().unwrap(), -33.33, 1e-9);
    assert_eq!(lcp["improved"], true);
    assert_eq!(report["web_vitals"]["LCP"]["status"], "good");
}

#[tokio::test]
async fn invalid_baseline_is_rejected() {
    let dir = TempDir::new("vitalscope-baseline").expect("temp dir");
    let path = dir.join("baseline.json");
    std::fs::write(&path, "not a report").unwrap();

    let (context, _) = memory_context();
    let err = execute(&context, Command::Report { baseline: Some(path) }).await.unwrap_err();
    assert!(matches!(err, VitalScopeError::InvalidInput(_)), "{err}");
}

#[tokio::test]
async fn high_error_rate_triggers_recommendation() {
    let (context, _) = memory_context();

    for i in 0..94 {
        let value = (100 + i).to_string();
        run(&context, &["record", "performance", "render", &value]).await;
    }
    for _ in 0..6 {
        run(&context, &["error", "NetworkError", "request timed out"]).await;
    }

    let report = run(&context, &["report"]).await;
    assert_eq!(report["summary"]["total_metrics"], 100);
    assert_eq!(report["errors"]["total"], 6);
    assert_eq!(report["errors"]["error_rate"], "6.00");
    assert_eq!(report["errors"]["by_type"]["NetworkError"], 6);

    let recommendations = report["recommendations"].as_array().unwrap();
    let error_rec = recommendations
        .iter()
        .find(|rec| rec["metric"] == "error_rate")
        .expect("error rate recommendation");
    assert_eq!(error_rec["priority"], "high");
    assert_eq!(report["performance"]["render"]["count"], 94);
}

#[tokio::test]
async fn ingest_replays_entries_into_vitals() {
    let dir = TempDir::new("vitalscope-ingest").expect("temp dir");
    let path = dir.join("entries.jsonl");
    std::fs::write(
        &path,
        concat!(
            "{\"entry_type\":\"navigation\",\"request_start\":20.0,\"response_start\":320.0}\n",
            "\n",
            "{\"entry_type\":\"largest-contentful-paint\",\"start_time\":900.0,\"render_time\":1500.0}\n",
            "{\"entry_type\":\"layout-shift\",\"value\":0.05}\n",
            "{\"entry_type\":\"layout-shift\",\"value\":0.5,\"had_recent_input\":true}\n",
        ),
    )
    .unwrap();

    let (context, _) = memory_context();
    let out = run(&context, &["ingest", &path.display().to_string()]).await;

    assert_eq!(out["entries"], 4);
    assert_eq!(out["delivered"], 4);
    assert_eq!(out["web_vitals"]["TTFB"], 300.0);
    assert_eq!(out["web_vitals"]["LCP"], 1500.0);
    assert_eq!(out["web_vitals"]["CLS"], 0.05);

    let export = run(&context, &["export"]).await;
    assert_eq!(export["web_vitals"]["TTFB"], 300.0);
}

#[tokio::test]
async fn surveys_are_scored_and_summarised() {
    let (context, _) = memory_context();

    let sus = run(&context, &["sus", "5", "1", "5", "1", "5", "1", "5", "1", "5", "1"]).await;
    assert_eq!(sus["score"], 100.0);
    assert_eq!(sus["grade"], "excellent");

    let promoter = run(&context, &["nps", "10"]).await;
    assert_eq!(promoter["category"], "promoter");
    assert!(promoter.get("feedback").is_none());
    run(&context, &["nps", "3", "too slow"]).await;

    let summary = run(&context, &["surveys"]).await;
    assert_eq!(summary["sus"]["count"], 1);
    assert_eq!(summary["nps"]["count"], 2);
    assert_eq!(summary["nps"]["nps"], 0.0);

    let err = execute(&context, parse(&["sus", "5", "1", "5"])).await.unwrap_err();
    assert!(matches!(err, VitalScopeError::InvalidInput(_)));
}

#[tokio::test]
async fn clear_removes_persisted_history() {
    let dir = TempDir::new("vitalscope-clear").expect("temp dir");
    let context = AppContext::new_with_config(sqlite_config(&dir)).expect("context");

    run(&context, &["ttv", "42000", "first_report"]).await;
    run(&context, &["error", "TypeError", "undefined is not a function"]).await;
    assert_eq!(run(&context, &["export"]).await["metrics"].as_array().unwrap().len(), 2);

    assert_eq!(run(&context, &["clear"]).await["cleared"], true);
    assert!(run(&context, &["export"]).await["metrics"].as_array().unwrap().is_empty());

    let health = run(&context, &["health"]).await;
    assert_eq!(health["is_healthy"], true);
}
