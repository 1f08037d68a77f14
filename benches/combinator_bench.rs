//! Combinator pipeline benchmarks.
//!
//! Run with: `cargo bench --bench combinator_bench`

use combinaut::combinator::perm::Permutations;
use combinaut::combinator::pipeline::{combinations_for_length, emit_insertions, PipelineArgs};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn words(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("t{i}").into_bytes()).collect()
}

fn bench_ordered_subsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_subsets");

    let base = words(8);
    for k in [1usize, 3, 5] {
        group.bench_function(format!("n8_k{k}"), |b| {
            b.iter(|| Permutations::new(black_box(&base), black_box(k)).count())
        });
    }

    group.finish();
}

fn bench_combined_subsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("combined_subsets");

    let base = words(6);
    let augmented = words(3);
    for l in [2usize, 4] {
        group.bench_function(format!("l{l}"), |b| {
            b.iter(|| {
                combinations_for_length(black_box(&base), black_box(&augmented), l).count()
            })
        });
    }

    group.finish();
}

fn bench_emit_insertions(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit_insertions");

    let combo = words(4);
    let word = b"inserted".to_vec();
    group.throughput(Throughput::Elements((combo.len() + 1) as u64));

    group.bench_function("length4_combo", |b| {
        let mut out = Vec::new();
        b.iter(|| {
            out.clear();
            emit_insertions(black_box(&combo), black_box(&word), b"-", &mut out);
        })
    });

    group.finish();
}

fn bench_run_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_pipeline");

    let base = words(5);
    let wordlists = vec![words(50)];

    group.bench_function("self_combination_only", |b| {
        b.iter(|| {
            let mut out: Vec<u8> = Vec::new();
            let args = PipelineArgs {
                base: &base,
                augmented: &[],
                min_target: 1,
                max_target: 3,
                self_combination: true,
                separator: b"",
                wordlists: &[],
                skip: 0,
                limit: None,
                workers: 1,
            };
            combinaut::combinator::pipeline::run_pipeline(args, &mut out).unwrap();
            black_box(out.len())
        })
    });

    group.bench_function("with_wordlist", |b| {
        b.iter(|| {
            let mut out: Vec<u8> = Vec::new();
            let args = PipelineArgs {
                base: &base,
                augmented: &[],
                min_target: 1,
                max_target: 2,
                self_combination: false,
                separator: b"-",
                wordlists: &wordlists,
                skip: 0,
                limit: None,
                workers: 1,
            };
            combinaut::combinator::pipeline::run_pipeline(args, &mut out).unwrap();
            black_box(out.len())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ordered_subsets,
    bench_combined_subsets,
    bench_emit_insertions,
    bench_run_pipeline
);
criterion_main!(benches);
