//! Benchmarks for payload parsing and guard decisions.
//!
//! Run with: cargo bench -p block-guard

use block_guard::prelude::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn edit_payload(creates: usize) -> String {
    let items: Vec<&str> = std::iter::repeat_n(r#"{"label":"x","sort":1}"#, creates).collect();
    format!(r#"{{"title":"Bench","items":{{"create":[{}],"delete":[1]}}}}"#, items.join(","))
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload");

    for creates in [1, 4, 32] {
        let raw = edit_payload(creates);
        group.bench_with_input(BenchmarkId::new("parse", creates), &raw, |b, raw| {
            b.iter(|| Payload::parse(black_box(raw.as_bytes())))
        });
    }

    group.finish();
}

fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlights");

    let store = MemoryStore::new().with_count("block_highlights_items", "highlights", "H1", 3);
    let keys = [ParentKey::from("H1")];
    let update = ValidationContext::update("block_highlights", &keys, &store);
    let create = ValidationContext::create("block_highlights", &store);
    let guard = guards::highlights();

    let passing = Payload::parse(edit_payload(2).as_bytes()).expect("valid payload");
    let untouched = Payload::parse(br#"{"title":"Only a title"}"#).expect("valid payload");

    group.bench_function("check_update", |b| {
        b.iter(|| guard.check(black_box(&passing), &update))
    });
    group.bench_function("check_create", |b| {
        b.iter(|| guard.check(black_box(&passing), &create))
    });
    group.bench_function("check_untouched", |b| {
        b.iter(|| guard.check(black_box(&untouched), &update))
    });

    group.finish();
}

fn bench_registry(c: &mut Criterion) {
    let mut registry = HookRegistry::<MemoryStore>::new();
    guards::register_all(&mut registry);
    let store = MemoryStore::new();
    let meta = Meta::new("block_tabbed_content");
    let payload = Payload::parse(br#"{"tabs":{"create":[{},{},{}]}}"#).expect("valid payload");

    c.bench_function("registry_create", |b| {
        b.iter(|| registry.run(Event::Create, black_box(payload.clone()), &meta, &store))
    });
}

criterion_group!(benches, bench_parse, bench_check, bench_registry);
criterion_main!(benches);
