use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vitalscope_core::MetricsAnalyzer;
use vitalscope_domain::{MetricCategory, MetricEvent, MetricPayload, VitalName};

const JAN_1: i64 = 1_704_067_200_000;
const HOUR_MS: i64 = 3_600_000;

fn sample_history(len: usize) -> Vec<MetricEvent> {
    (0..len)
        .map(|idx| {
            let timestamp = JAN_1 + idx as i64 * HOUR_MS / 4;
            let (name, value, payload) = match idx % 5 {
                0 => {
                    let vital = VitalName::ALL[idx / 5 % 5];
                    let value = match vital {
                        VitalName::Cls => 0.01 * (idx % 30) as f64,
                        _ => 400.0 + (idx * 37 % 4000) as f64,
                    };
                    (vital.to_string(), value, MetricPayload::WebVital { rating: Some(vital.classify(value)) })
                }
                1 => (
                    "task_completion".to_string(),
                    1000.0 + (idx % 17) as f64 * 250.0,
                    MetricPayload::Task { task_id: Some(format!("task-{}", idx % 12)), success: Some(idx % 9 != 0) },
                ),
                2 => ("TTV".to_string(), 60_000.0 + (idx % 40) as f64 * 15_000.0, MetricPayload::Ux { step: None }),
                3 => ("NetworkError".to_string(), 1.0, MetricPayload::Error { message: None }),
                _ => ("render".to_string(), (idx % 33) as f64, MetricPayload::empty(MetricCategory::Performance)),
            };

            MetricEvent { name, value, timestamp, url: "app://bench".to_string(), payload }
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let generated_at = Utc.timestamp_millis_opt(JAN_1).single().unwrap();
    let mut group = c.benchmark_group("analyze");

    for len in [100, 1000] {
        let history = sample_history(len);
        let baseline = MetricsAnalyzer::analyze_at(&history[..len / 2], None, generated_at);

        group.bench_with_input(BenchmarkId::new("no_baseline", len), &history, |b, history| {
            b.iter(|| MetricsAnalyzer::analyze_at(black_box(history), None, generated_at));
        });
        group.bench_with_input(BenchmarkId::new("with_baseline", len), &history, |b, history| {
            b.iter(|| MetricsAnalyzer::analyze_at(black_box(history), Some(&baseline), generated_at));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
