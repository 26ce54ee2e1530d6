//! Cross-parser comparison benchmarks.
//!
//! Compares stepjson against serde_json on the same input. serde_json
//! builds a `serde_json::Value` tree, stepjson builds an `Element` tree,
//! so both measure parse plus full tree construction.
//!
//! Run with: cargo bench --bench compare
//!
//! stepjson never validates tokens or unescapes strings, so it is
//! expected to be competitive on flat documents and to lose ground as
//! documents get more deeply keyed (object lookups are linear).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stepjson_core::{parse, Element};

/// Flat list of small objects, valid JSON.
fn generate_flat(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| format!("{{\"id\":\"{i}\",\"label\":\"item number {i}\",\"qty\":\"{}\"}}", i % 50))
        .collect();
    format!("[{}]", items.join(","))
}

/// Objects nested `depth` levels deep, valid JSON.
fn generate_nested(depth: usize) -> String {
    let mut doc = String::from("\"leaf\"");
    for level in 0..depth {
        doc = format!("{{\"level\":\"{level}\",\"child\":{doc},\"peers\":[1,2,3]}}");
    }
    doc
}

fn count_nodes(el: &Element) -> usize {
    1 + el.children().map(count_nodes).sum::<usize>()
}

fn bench_flat(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_flat");

    for count in [100, 1000, 10000] {
        let input = generate_flat(count);
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_with_input(BenchmarkId::new("stepjson", count), &input, |b, input| {
            b.iter(|| parse(black_box(input)).map(|root| count_nodes(&root)))
        });
        group.bench_with_input(BenchmarkId::new("serde_json", count), &input, |b, input| {
            b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(input)))
        });
    }

    group.finish();
}

fn bench_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("compare_nested");

    for depth in [8, 64] {
        let input = generate_nested(depth);
        group.throughput(Throughput::Bytes(input.len() as u64));

        group.bench_with_input(BenchmarkId::new("stepjson", depth), &input, |b, input| {
            b.iter(|| parse(black_box(input)))
        });
        group.bench_with_input(BenchmarkId::new("serde_json", depth), &input, |b, input| {
            b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(input)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flat, bench_nested);
criterion_main!(benches);
