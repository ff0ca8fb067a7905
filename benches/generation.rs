//! Benchmark: Program Generation per Strategy
//!
//! Measures the cost of building and rendering each construction on the
//! shapes used in the identifiability examples:
//! - 3x3x3, rank 2, one structural zero
//! - 4x4x4, rank 3, four structural zeros (slicing emits 12 matrices)
//! - 3x3x3 Strassen expansion (nine quartics over 27 variables)

use constrained_secant::strategy::strassen::strassen_polynomials;
use constrained_secant::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

fn config(dims: &[usize], rank: usize, constraints: &str, strategy: Strategy) -> Configuration {
    Configuration::builder()
        .with_shape(dims)
        .with_rank(rank)
        .with_constraints(constraints.parse().unwrap())
        .with_strategy(strategy)
        .build()
        .unwrap()
}

/// Elimination strategies on 3x3x3
fn bench_small(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_333_rank2");
    group.measurement_time(Duration::from_secs(5));

    for strategy in [
        Strategy::Full,
        Strategy::Slicing { minor_size: 3 },
        Strategy::Flattening { minor_size: None },
        Strategy::Strassen,
    ] {
        let config = config(&[3, 3, 3], 2, "2,0,0", strategy);
        group.bench_function(strategy.tag(), |b| b.iter(|| black_box(generate(&config))));
    }

    group.finish();
}

/// Overcomplete 4x4x4 example
fn bench_overcomplete(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_444_rank3");
    group.sample_size(50);

    for strategy in [Strategy::Full, Strategy::Slicing { minor_size: 3 }] {
        let config = config(&[4, 4, 4], 3, "2,0,0;2,0,1;2,1,0;2,1,1", strategy);
        group.bench_function(strategy.tag(), |b| b.iter(|| black_box(generate(&config))));
    }

    group.finish();
}

/// Symbolic expansion of the Strassen commutator alone
fn bench_strassen_expansion(c: &mut Criterion) {
    c.bench_function("strassen_expansion", |b| {
        b.iter(|| black_box(strassen_polynomials()))
    });
}

criterion_group!(benches, bench_small, bench_overcomplete, bench_strassen_expansion);
criterion_main!(benches);
