//! Criterion benchmarks for the rewire engine.
//!
//! Run with:
//!   cargo bench
//!   cargo bench --features parallel,simd
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rewire::prelude::*;

fn make_network<M: Connectivity>(n: usize, tier: ExecutionTier, seed: u64) -> Network<M> {
    let cfg = NetworkConfig::with_size(n)
        .with_alpha(0.2)
        .with_beta(10.0)
        .with_tau(10)
        .with_seed(seed)
        .with_tier(tier);
    let p = (4.0 / n as f64).min(0.5);
    Network::new(cfg, &RandomState::new(0.5), &RandomConnectivity::new(p, p))
        .expect("valid benchmark config")
}

/// Benchmark one fast step with varying network sizes, dense vs sparse.
fn bench_fast_step_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("fast_step_size");

    for size in [64usize, 256, 1024, 4096].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("dense", size), size, |b, &size| {
            let mut net: Network<DenseMatrix> = make_network(size, ExecutionTier::Scalar, 42);
            b.iter(|| black_box(net.step_state()));
        });

        group.bench_with_input(BenchmarkId::new("sparse", size), size, |b, &size| {
            let mut net: Network<SparseMatrix> = make_network(size, ExecutionTier::Scalar, 42);
            b.iter(|| black_box(net.step_state()));
        });
    }

    group.finish();
}

/// Benchmark one fast step comparing execution tiers at a fixed size.
fn bench_fast_step_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("fast_step_tier");
    let size = 2048usize;
    group.throughput(Throughput::Elements(size as u64));

    for (name, tier) in [
        ("scalar", ExecutionTier::Scalar),
        ("simd", ExecutionTier::Simd),
        ("parallel", ExecutionTier::Parallel),
    ] {
        group.bench_function(BenchmarkId::new(name, size), |b| {
            let mut net: Network<DenseMatrix> = make_network(size, tier, 7);
            b.iter(|| black_box(net.step_state()));
        });
    }

    group.finish();
}

/// Benchmark the rewiring step alone on a sparse network.
fn bench_rewiring(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewiring");

    for size in [256usize, 4096].iter() {
        group.bench_with_input(BenchmarkId::new("sparse", size), size, |b, &size| {
            let mut net: Network<SparseMatrix> = make_network(size, ExecutionTier::Scalar, 3);
            net.step_state();
            b.iter(|| black_box(net.step_rewiring()));
        });
    }

    group.finish();
}

/// Benchmark a short complete run.
fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.sample_size(20);

    group.bench_function("n100_steps100", |b| {
        let mut net: Network<DenseMatrix> = make_network(100, ExecutionTier::Scalar, 42);
        b.iter(|| {
            net.reset();
            let series = net.run(100, false).expect("run");
            black_box(series.len())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_fast_step_sizes,
    bench_fast_step_tiers,
    bench_rewiring,
    bench_run
);
criterion_main!(benches);
