//! Benchmarks for flattening
//!
//! Run with: cargo bench
//! Parallel variant: cargo bench --features parallel

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use survey_tables::flatten::{FlattenConfig, FlattenEngine};
use survey_tables::models::{FormDescription, GroupSpec, QuestionSpec};

fn engine() -> FlattenEngine {
    let form = FormDescription::new()
        .with_question("start", QuestionSpec::new("start"))
        .with_question("age", QuestionSpec::new("integer"))
        .with_group(
            "location",
            GroupSpec::section().with_question("village", QuestionSpec::new("text")),
        )
        .with_group(
            "household",
            GroupSpec::repeat()
                .with_question("size", QuestionSpec::new("integer"))
                .with_group(
                    "person",
                    GroupSpec::repeat()
                        .with_question("name", QuestionSpec::new("text"))
                        .with_question("age", QuestionSpec::new("integer")),
                ),
        );
    match FlattenEngine::from_form(&form, FlattenConfig::default()) {
        Ok(engine) => engine,
        Err(err) => panic!("benchmark form is invalid: {err}"),
    }
}

/// Generate submissions with 1-3 households of 0-4 people each
fn generate_submissions(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let households: Vec<Value> = (0..(1 + i % 3))
                .map(|h| {
                    let people: Vec<Value> = (0..((i + h) % 5))
                        .map(|p| {
                            json!({
                                "household/person/name": format!("Person {}", p),
                                "household/person/age": 10 + (p * 7) % 70
                            })
                        })
                        .collect();
                    json!({"household/size": people.len(), "household/person": people})
                })
                .collect();
            json!({
                "_id": i,
                "_submission_time": "2024-01-15T10:30:00",
                "start": "2024-01-15T10:00:00",
                "age": 20 + (i % 60),
                "location/village": format!("Village {}", i % 40),
                "household": households
            })
        })
        .collect()
}

/// Benchmark sequential flattening with varying batch sizes
fn bench_flatten(c: &mut Criterion) {
    let engine = engine();
    let mut group = c.benchmark_group("flatten");

    for count in [10, 100, 1000].iter() {
        let submissions = generate_submissions(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(
            BenchmarkId::new("sequential", count),
            &submissions,
            |b, submissions| b.iter(|| black_box(engine.flatten(submissions))),
        );

        #[cfg(feature = "parallel")]
        group.bench_with_input(
            BenchmarkId::new("parallel", count),
            &submissions,
            |b, submissions| b.iter(|| black_box(engine.flatten_parallel(submissions))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_flatten);
criterion_main!(benches);
