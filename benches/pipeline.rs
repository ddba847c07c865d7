//! Benchmarks for convopack processing operations.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench pipeline -- flatten`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Local, TimeZone};
use convopack::config::RenderConfig;
use convopack::core::flatten::{FlattenMode, flatten_with};
use convopack::core::output::to_combined_markdown;
use convopack::core::processor::deduplicate;
use convopack::core::Corpus;
use convopack::ingest::parse_payload;
use convopack::Record;

// =============================================================================
// Test Data Generators
// =============================================================================

/// A linear graph-form conversation with `turns` messages.
fn generate_conversation(id: usize, turns: usize) -> String {
    let mut nodes = Vec::with_capacity(turns + 1);
    nodes.push(r#""root": {"message": null, "parent": null, "children": ["n0"]}"#.to_string());
    for i in 0..turns {
        let role = if i % 2 == 0 { "user" } else { "assistant" };
        let parent = if i == 0 { "root".to_string() } else { format!("n{}", i - 1) };
        nodes.push(format!(
            r#""n{i}": {{"parent": "{parent}", "children": ["n{}"], "message": {{"author": {{"role": "{role}"}}, "content": {{"parts": ["Message number {i}"]}}}}}}"#,
            i + 1
        ));
    }
    format!(
        r#"{{"id": "conv-{id}", "title": "Conversation {id}", "create_time": {}, "current_node": "n{}", "mapping": {{{}}}}}"#,
        1_700_000_000 + id * 60,
        turns.saturating_sub(1),
        nodes.join(", ")
    )
}

/// A payload of `count` conversations where every fifth one repeats an earlier id.
fn generate_payload(count: usize, turns: usize) -> String {
    let conversations: Vec<String> = (0..count)
        .map(|i| generate_conversation(if i % 5 == 4 { i - 1 } else { i }, turns))
        .collect();
    format!("[{}]", conversations.join(",\n"))
}

fn generate_records(count: usize, turns: usize) -> Vec<Record> {
    parse_payload(generate_payload(count, turns).as_bytes()).unwrap()
}

// =============================================================================
// Parsing Benchmarks
// =============================================================================

fn bench_parse_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_payload");

    for size in [10_usize, 100, 1_000] {
        let payload = generate_payload(size, 20);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| {
                let records = parse_payload(black_box(payload.as_bytes())).unwrap();
                black_box(records)
            });
        });
    }
    group.finish();
}

// =============================================================================
// Processing Benchmarks
// =============================================================================

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    let record = generate_records(1, 500).remove(0);

    for mode in [FlattenMode::InsertionOrder, FlattenMode::MainLine] {
        group.throughput(Throughput::Elements(500));
        group.bench_with_input(BenchmarkId::from_parameter(mode), &record, |b, record| {
            b.iter(|| black_box(flatten_with(black_box(record), mode)));
        });
    }
    group.finish();
}

fn bench_deduplicate(c: &mut Criterion) {
    let mut group = c.benchmark_group("deduplicate");

    for size in [100_usize, 1_000, 10_000] {
        let records = generate_records(size, 2);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| {
                let unique = deduplicate(black_box(records.clone()));
                black_box(unique)
            });
        });
    }
    group.finish();
}

// =============================================================================
// Output Benchmarks
// =============================================================================

fn bench_combined_markdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("combined_markdown");
    let config = RenderConfig::new()
        .with_generated_at(Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

    for size in [10_usize, 100, 1_000] {
        let corpus = Corpus::from_records(generate_records(size, 20));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &corpus, |b, corpus| {
            b.iter(|| black_box(to_combined_markdown(black_box(corpus), &config)));
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_parse_payload,
    bench_flatten,
    bench_deduplicate,
    bench_combined_markdown,
);

criterion_main!(benches);
