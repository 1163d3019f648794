//! Benchmark for sponge expansion and VOX encoding.
//!
//! Run with: cargo bench --package menger_procedural --bench sponge_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use menger_core::Palette;
use menger_procedural::{DeletionTable, Shading, SpongeGenerator};
use menger_vox::VoxWriter;

fn benchmark_expansion(c: &mut Criterion) {
    let mut group = c.benchmark_group("sponge_expansion");

    for depth in 1..=5u32 {
        group.throughput(Throughput::Elements(27u64.pow(depth)));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                // Fresh generator each run so the cache never hits.
                let mut gen = SpongeGenerator::new().with_table(DeletionTable::menger());
                black_box(gen.grid(i64::from(depth)).map(|g| g.occupied_count()).ok())
            });
        });
    }

    group.finish();
}

fn benchmark_leveled(c: &mut Criterion) {
    c.bench_function("leveled_depth_4", |b| {
        b.iter(|| {
            let mut gen = SpongeGenerator::new()
                .with_table(DeletionTable::menger())
                .with_shading(Shading::Leveled);
            black_box(gen.grid(4).map(|g| g.max_value()).ok())
        });
    });
}

fn benchmark_cached_lookup(c: &mut Criterion) {
    let mut gen = SpongeGenerator::new().with_table(DeletionTable::menger());
    let _ = gen.grid(4);

    c.bench_function("cached_depth_4", |b| {
        b.iter(|| black_box(gen.grid(4).map(|g| g.side()).ok()));
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let mut gen = SpongeGenerator::new().with_table(DeletionTable::menger());
    let grid = gen.grid(5).cloned().unwrap_or_else(|_| menger_core::VoxelGrid::unit());
    let palette = Palette::default();

    let mut group = c.benchmark_group("vox_encode");
    group.sample_size(20);
    group.throughput(Throughput::Elements(grid.occupied_count() as u64));
    group.bench_function("depth_5", |b| {
        b.iter(|| black_box(VoxWriter::encode(&grid, &palette).map(|bytes| bytes.len()).ok()));
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_expansion,
    benchmark_leveled,
    benchmark_cached_lookup,
    benchmark_encode
);
criterion_main!(benches);
