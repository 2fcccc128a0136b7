//! Benchmarks of the CPU-bound pipeline stages: wire decoding, resampling and
//! stitching.
//!
//! Run with: `cargo bench --package qhp-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use qhp_aggregate::resample;
use qhp_bench::{synthetic_bars, synthetic_contracts};
use qhp_fetch::{decode_bars, encode_bars};
use qhp_stitch::stitch;
use std::hint::black_box;

const SIZES: [usize; 3] = [1_000, 100_000, 1_000_000];

fn decode_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for size in SIZES {
        let payload = encode_bars(&synthetic_bars(size, 60));
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| {
                let bars = decode_bars(black_box(payload)).unwrap();
                bars.fold(0.0, |acc, bar| acc + bar.close)
            });
        });
    }
    group.finish();
}

fn resample_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    for size in SIZES {
        let bars = synthetic_bars(size, 60);
        group.throughput(Throughput::Elements(size as u64));
        for period in [300_u64, 3_600] {
            group.bench_with_input(
                BenchmarkId::new(format!("{period}s"), size),
                &bars,
                |b, bars| b.iter(|| resample(black_box(bars.iter().copied()), period).unwrap()),
            );
        }
    }
    group.finish();
}

fn stitch_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("stitch");
    group.sample_size(20);
    for contracts in [4_usize, 16] {
        let series = synthetic_contracts(contracts, 100, 91);
        let total: usize = series.iter().map(|s| s.len()).sum();
        group.throughput(Throughput::Elements(total as u64));
        group.bench_with_input(BenchmarkId::from_parameter(contracts), &series, |b, series| {
            b.iter(|| stitch("Si", black_box(series.clone()), 5));
        });
    }
    group.finish();
}

criterion_group!(benches, decode_benchmark, resample_benchmark, stitch_benchmark);
criterion_main!(benches);
