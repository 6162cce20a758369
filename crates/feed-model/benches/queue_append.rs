//! Benchmarks for payload parsing and queue appends
//!
//! Run with: cargo bench --package feed-model

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feed_model::{parse_payload, CandidateItem, CandidateQueue};
use serde_json::{json, Value};

fn build_payload(count: usize) -> Value {
    let records: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("job-{}", i),
                "title": format!("Position {}", i),
                "organization": "Acme",
                "match_score": 0.5,
                "skills": ["rust", "sql", "kubernetes"],
            })
        })
        .collect();
    Value::Array(records)
}

fn bench_parse_payload(c: &mut Criterion) {
    let payload = build_payload(50);

    c.bench_function("parse_payload_50", |b| {
        b.iter(|| {
            let batch = parse_payload(black_box(&payload)).unwrap();
            black_box(batch)
        })
    });
}

fn bench_append_with_duplicates(c: &mut Criterion) {
    // Half of every second batch overlaps the first one
    let first: Vec<CandidateItem> = (0..500)
        .map(|i| CandidateItem::new(format!("job-{}", i), "Position"))
        .collect();
    let second: Vec<CandidateItem> = (250..750)
        .map(|i| CandidateItem::new(format!("job-{}", i), "Position"))
        .collect();

    c.bench_function("append_500_overlapping", |b| {
        b.iter(|| {
            let mut queue = CandidateQueue::from_items(first.clone());
            let appended = queue.append(black_box(second.clone()));
            black_box(appended)
        })
    });
}

criterion_group!(benches, bench_parse_payload, bench_append_with_duplicates);
criterion_main!(benches);
