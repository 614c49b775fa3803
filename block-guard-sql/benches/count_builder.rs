//! Benchmarks for count query building.
//!
//! Run with: cargo bench -p block-guard-sql

use block_guard_sql::{Operator, Value, is_valid_sql_identifier, postgres, sqlite};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_identifier_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("identifier");

    let identifiers = [
        ("short", "tabs"),
        ("guard_table", "block_highlights_items"),
        ("invalid", "block_tabs; DROP TABLE block_tabs"),
    ];

    for (name, ident) in identifiers {
        group.bench_with_input(BenchmarkId::new("validate", name), ident, |b, s| {
            b.iter(|| is_valid_sql_identifier(black_box(s)))
        });
    }

    group.finish();
}

fn bench_count_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_builder");

    group.bench_function("postgres_by_parent", |b| {
        b.iter(|| {
            postgres(black_box("block_highlights_items"))
                .where_eq("highlights", black_box("H1"))
                .build()
        })
    });

    group.bench_function("sqlite_by_parent", |b| {
        b.iter(|| {
            sqlite(black_box("block_tabs"))
                .where_eq("tabbed_content", black_box(42_i64))
                .build()
        })
    });

    group.bench_function("sqlite_membership", |b| {
        let parents: Vec<Value> = (0..16_i64).map(Value::Int).collect();
        b.iter(|| {
            sqlite("block_tabs")
                .filter("tabbed_content", Operator::In, Value::Array(parents.clone()))
                .build()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_identifier_validation, bench_count_builder);
criterion_main!(benches);
