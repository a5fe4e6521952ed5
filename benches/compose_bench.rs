//! Benchmark for optic composition and evaluation.
//!
//! Measures how chain shape affects composition cost, and the cost of the
//! bulk operations over deep and wide values.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use optica::optics::{Optic, compose};
use optica::value::{Record, Value};
use std::hint::black_box;

fn nested_record(depth: usize) -> Value {
    (0..depth).fold(Value::Int(0), |inner, _| {
        Value::from(Record::builder("Node").field("next", inner).field("tag", "n").build())
    })
}

fn field_chain(depth: usize) -> impl Iterator<Item = Optic> {
    (0..depth).map(|_| Optic::field("next"))
}

fn increment(value: Value) -> Value {
    Value::Int(value.as_int().unwrap_or_default() + 1)
}

// =============================================================================
// Composition Benchmarks
// =============================================================================

fn benchmark_compose_shape(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("compose_shape");

    for depth in [4, 16, 64] {
        group.bench_with_input(
            BenchmarkId::new("left_nested", depth),
            &depth,
            |bencher, &depth| {
                bencher.iter(|| black_box(field_chain(depth).fold(Optic::identity(), compose)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("right_nested", depth),
            &depth,
            |bencher, &depth| {
                bencher.iter(|| {
                    let optics: Vec<_> = field_chain(depth).collect();
                    black_box(
                        optics
                            .into_iter()
                            .rev()
                            .fold(Optic::identity(), |inner, outer| compose(outer, inner)),
                    )
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Evaluation Benchmarks
// =============================================================================

fn benchmark_deep_path(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("deep_path");

    for depth in [4, 16, 64] {
        let source = nested_record(depth);
        let optic = field_chain(depth).fold(Optic::identity(), compose);

        group.bench_with_input(BenchmarkId::new("get", depth), &depth, |bencher, _| {
            bencher.iter(|| black_box(optic.get(black_box(&source))));
        });

        group.bench_with_input(BenchmarkId::new("set", depth), &depth, |bencher, _| {
            bencher.iter(|| black_box(optic.set(source.clone(), Value::Int(1))));
        });

        group.bench_with_input(
            BenchmarkId::new("set_in_place", depth),
            &depth,
            |bencher, _| {
                bencher.iter(|| {
                    let mut target = nested_record(depth);
                    black_box(optic.set_in_place(&mut target, Value::Int(1)))
                });
            },
        );
    }

    group.finish();
}

fn benchmark_wide_traversal(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("wide_traversal");

    for width in [100, 1_000, 10_000] {
        let source = Value::seq((0..width).map(|index| {
            Value::from(Record::builder("Point").field("x", index).field("y", 0).build())
        }));
        let xs = Optic::elements().then(Optic::field("x"));

        group.bench_with_input(BenchmarkId::new("modify", width), &width, |bencher, _| {
            bencher.iter(|| black_box(xs.modify(source.clone(), increment)));
        });

        group.bench_with_input(BenchmarkId::new("get_all", width), &width, |bencher, _| {
            bencher.iter(|| black_box(xs.get_all(&source)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_compose_shape,
    benchmark_deep_path,
    benchmark_wide_traversal
);

criterion_main!(benches);
