//! Benchmarks for the name-to-fingerprint pipeline
//!
//! Run with: cargo bench -p qcanvas

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;

use qcanvas::{BackendKind, Canvas, CanvasConfig, NullSink, derive_seed, sample_parameters};

fn bench_seed_and_params(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");

    group.bench_function("derive_seed", |b| {
        b.iter(|| derive_seed(black_box("Muhammed Rasin")).unwrap());
    });

    for count in &[40, 160, 640] {
        group.bench_with_input(BenchmarkId::new("sample_parameters", count), count, |b, &k| {
            b.iter(|| sample_parameters(black_box(3_060_498_140), black_box(k)));
        });
    }

    group.finish();
}

fn bench_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare");

    for num_qubits in &[5, 10, 15] {
        let config = CanvasConfig::new(*num_qubits, 3, 100).unwrap();
        let canvas = Canvas::new(config, BackendKind::Local)
            .unwrap()
            .with_events(Arc::new(NullSink));
        group.bench_with_input(BenchmarkId::new("qubits", num_qubits), &canvas, |b, canvas| {
            b.iter(|| canvas.prepare(black_box("Alice")).unwrap());
        });
    }

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("generate_local");
    group.sample_size(20);

    for num_qubits in &[5, 10] {
        let config = CanvasConfig::new(*num_qubits, 3, 1000).unwrap();
        let canvas = Canvas::new(config, BackendKind::Local)
            .unwrap()
            .with_events(Arc::new(NullSink))
            .with_simulator_seed(7);
        group.bench_with_input(BenchmarkId::new("qubits", num_qubits), &canvas, |b, canvas| {
            b.iter(|| rt.block_on(canvas.generate(black_box("Alice"))).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_seed_and_params, bench_prepare, bench_generate);
criterion_main!(benches);
