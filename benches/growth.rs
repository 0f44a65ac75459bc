//! Benchmark: duplication vs handover across growth schedules.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use relocation::workload;

fn bench_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("relocation");
    for size in [64usize, 512, 4096] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("duplicate", size), &size, |b, &size| {
            b.iter(|| black_box(workload::run_clone(size)))
        });
        group.bench_with_input(BenchmarkId::new("transfer", size), &size, |b, &size| {
            b.iter(|| black_box(workload::run_box(size)))
        });
        group.bench_with_input(BenchmarkId::new("native", size), &size, |b, &size| {
            b.iter(|| black_box(workload::run_native_baseline(size)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_growth);
criterion_main!(benches);
