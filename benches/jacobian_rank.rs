//! Benchmark: Terracini Jacobian Rank
//!
//! Evaluates the CP Jacobian at a seeded point and reduces it over Z/32003,
//! for growing cubic tensors at rank 3.

use constrained_secant::field::gaussian::reduce_matrix;
use constrained_secant::field::matrix::JacobianMatrix;
use constrained_secant::field::WorkingField;
use constrained_secant::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_jacobian_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobian_rank");
    let field = WorkingField::from_spec(&FieldSpec::default()).unwrap();

    for n in [3usize, 4, 5, 6] {
        let config = Configuration::builder()
            .with_shape(&[n, n, n])
            .with_rank(3)
            .build()
            .unwrap();
        let ctx = GenerationContext::new(&config);
        let mut rng = StdRng::seed_from_u64(n as u64);
        let point: Vec<_> = ctx
            .free_factors()
            .iter()
            .map(|_| field.element(field.sample(&mut rng)))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mut jacobian = JacobianMatrix::evaluate(
                    field.ring(),
                    ctx.assembly(),
                    ctx.free_factors(),
                    &point,
                );
                black_box(reduce_matrix(&mut jacobian))
            })
        });
    }

    group.finish();
}

/// Full Terracini planning, including script rendering
fn bench_terracini_plan(c: &mut Criterion) {
    let config = Configuration::builder()
        .with_shape(&[4, 4, 4])
        .with_rank(3)
        .with_constraint(2, 0, 0)
        .build()
        .unwrap();
    c.bench_function("terracini_plan_444", |b| {
        b.iter(|| {
            let mut planner = strategy::TerraciniPlanner::from_seed(Some(1));
            black_box(generate_with(&config, &mut planner))
        })
    });
}

criterion_group!(benches, bench_jacobian_rank, bench_terracini_plan);
criterion_main!(benches);
