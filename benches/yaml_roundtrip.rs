//! Parse and serialize throughput on generated documents.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Block-style document with `count` records, mixing scalar kinds, flow
/// collections, block scalars and anchors.
fn make_block_document(count: usize) -> String {
    let mut yaml = String::with_capacity(count * 160);
    yaml.push_str("defaults: &defaults {retries: 3, timeout: 1.5}\nrecords:\n");
    for i in 0..count {
        yaml.push_str(&format!("  - id: {}\n", i));
        yaml.push_str(&format!("    name: \"record {}\"\n", i));
        yaml.push_str("    enabled: true\n");
        yaml.push_str(&format!("    tags: [t{}, shared, '{}']\n", i % 7, i % 3));
        yaml.push_str("    settings: *defaults\n");
        if i % 4 == 0 {
            yaml.push_str("    notes: |\n      first line\n      second line\n");
        }
    }
    yaml
}

/// Single line of nested flow collections.
fn make_flow_document(count: usize) -> String {
    let items: Vec<String> = (0..count)
        .map(|i| format!("{{k{}: [{}, {}.5, x, ~]}}", i, i, i))
        .collect();
    format!("[{}]", items.join(", "))
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &count in &[10, 100, 1000] {
        let yaml = make_block_document(count);
        group.throughput(Throughput::Bytes(yaml.len() as u64));
        group.bench_with_input(BenchmarkId::new("block", count), &yaml, |b, yaml| {
            b.iter(|| black_box(yamln::parse(black_box(yaml)).unwrap()))
        });

        let yaml = make_flow_document(count);
        group.throughput(Throughput::Bytes(yaml.len() as u64));
        group.bench_with_input(BenchmarkId::new("flow", count), &yaml, |b, yaml| {
            b.iter(|| black_box(yamln::parse(black_box(yaml)).unwrap()))
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for &count in &[10, 100, 1000] {
        let doc = yamln::parse(&make_block_document(count)).unwrap();
        group.bench_with_input(BenchmarkId::new("block", count), &doc, |b, doc| {
            b.iter(|| black_box(yamln::serialize(black_box(doc)).unwrap()))
        });
    }

    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let yaml = make_block_document(500);
    let mut group = c.benchmark_group("roundtrip");
    group.throughput(Throughput::Bytes(yaml.len() as u64));
    group.bench_function("parse_serialize_parse", |b| {
        b.iter(|| {
            let doc = yamln::parse(black_box(&yaml)).unwrap();
            let text = yamln::serialize(&doc).unwrap();
            black_box(yamln::parse(&text).unwrap())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_serialize, bench_roundtrip);
criterion_main!(benches);
